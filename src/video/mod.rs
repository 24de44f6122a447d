//! Video URL handling and metadata reshaping
//!
//! Pure functions of their inputs: nothing here touches the job store or the
//! network.

mod info;
mod url;

pub use info::{AudioFormat, ChannelInfo, Thumbnail, VideoFormat, VideoInfo, thumbnails_for};
pub use url::{extract_video_id, is_valid_url};
