//! Artwork loading. One fetch per call; no caching and no de-duplication.

use image::GenericImageView;
use reqwest::Url;

use super::fetcher::{Fetcher, HttpFetcher, NetworkFailure};

/// A fetched image that decoded successfully
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ImageLoader<F = HttpFetcher> {
    fetcher: F,
}

impl<F: Fetcher> ImageLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Bytes that do not decode as an image are reported as [`NetworkFailure::NoData`]
    pub async fn load_image(&self, url: &str) -> Result<LoadedImage, NetworkFailure> {
        let parsed = Url::parse(url).map_err(|e| {
            tracing::debug!(url, error = %e, "Artwork URL does not parse");
            NetworkFailure::NoData
        })?;

        let bytes = self.fetcher.fetch(&parsed).await?;

        let (bytes, dimensions) = tokio::task::spawn_blocking(move || {
            let dimensions = image::load_from_memory(&bytes).map(|image| image.dimensions());
            (bytes, dimensions)
        })
        .await
        .map_err(|_| NetworkFailure::NoData)?;

        let (width, height) = dimensions.map_err(|e| {
            tracing::debug!(url, error = %e, "Artwork did not decode");
            NetworkFailure::NoData
        })?;

        Ok(LoadedImage {
            url: url.to_string(),
            width,
            height,
            bytes,
        })
    }
}
