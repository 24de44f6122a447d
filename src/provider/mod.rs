//! Upstream provider API access
//!
//! The job tracker only sees the [`ProviderClient`] trait; [`RapidApiClient`]
//! is the production implementation backed by the RapidAPI "YouTube video fast
//! downloader" service.

mod rapidapi;
mod traits;
mod types;

pub use rapidapi::RapidApiClient;
pub use traits::ProviderClient;
pub use types::{DownloadLink, RawQuality, RawThumbnail, RawThumbnails, RawVideoInfo};
