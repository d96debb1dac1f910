//! Upstream search services
//!
//! The audio and image providers sit behind [`SoundSearch`] and
//! [`ImageSearch`] so handlers and tests can swap implementations.

pub mod freesound_client;
pub mod sound_aggregator;
pub mod unsplash_client;

use async_trait::async_trait;

use crate::models::SoundCandidate;

pub use freesound_client::{FreesoundClient, FreesoundError};
pub use sound_aggregator::{enrich, SoundAggregator};
pub use unsplash_client::{UnsplashClient, UnsplashError};

/// Audio-clip search provider
#[async_trait]
pub trait SoundSearch: Send + Sync {
    /// Relevance-sorted candidates for `query`, at most `page_size`
    async fn search(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<SoundCandidate>, FreesoundError>;

    /// Token appended to download references
    fn access_token(&self) -> Option<&str>;
}

/// Image search provider
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// "small" rendition URL of the first result, if any
    async fn first_image_url(&self, query: &str) -> Result<Option<String>, UnsplashError>;
}
