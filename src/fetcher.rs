//! Image fetching
//!
//! One fetch per design image, no retry and no cache. Every fetch is
//! independent: a failure becomes a placeholder for that card and never
//! stops the batch.

use crate::cli::PdfQuality;
use futures::stream::{self, StreamExt};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("read error: {0}")]
    Io(String),

    #[error("decode error: {0}")]
    Decode(String),
}

/// Decoded, downscaled image re-encoded as JPEG
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PixelBuffer, FetchError>> + Send;
}

/// Fetches http(s) URLs anonymously and reads `file://` URLs or plain paths
/// from disk.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    quality: PdfQuality,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration, quality: PdfQuality) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client, quality })
    }

    async fn read_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
            tokio::fs::read(&path)
                .await
                .map_err(|e| FetchError::Io(format!("{}: {}", path.display(), e)))
        }
    }
}

impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<PixelBuffer, FetchError> {
        let bytes = self.read_bytes(url).await?;
        let quality = self.quality;

        tokio::task::spawn_blocking(move || decode_image(&bytes, quality))
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?
    }
}

/// Decodes `bytes`, shrinks to the quality's maximum width and re-encodes as
/// JPEG.
pub fn decode_image(bytes: &[u8], quality: PdfQuality) -> Result<PixelBuffer, FetchError> {
    let image = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(FetchError::Decode("empty image".into()));
    }

    let max_width = quality.max_width();
    let image = if image.width() > max_width {
        let height = (image.height() as u64 * max_width as u64 / image.width() as u64).max(1) as u32;
        image.resize_exact(max_width, height, FilterType::Triangle)
    } else {
        image
    };

    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality()))
        .map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(PixelBuffer {
        width: rgb.width(),
        height: rgb.height(),
        jpeg,
    })
}

/// Outcome of the image step for one card
#[derive(Debug, Clone)]
pub enum ImageSlot {
    /// No image URL; nothing was fetched
    Missing,
    Loaded(PixelBuffer),
    Failed(FetchError),
}

/// Fetches every URL with at most `concurrency` requests in flight.
/// The result has one slot per input, in input order.
pub async fn fetch_ordered<F: ImageFetcher>(
    fetcher: &F,
    urls: &[Option<&str>],
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Vec<ImageSlot> {
    stream::iter(urls.iter().copied().map(move |url| async move {
        let slot = match url {
            None => ImageSlot::Missing,
            Some(url) => match fetcher.fetch(url).await {
                Ok(buffer) => {
                    debug!(url, width = buffer.width, height = buffer.height, "image fetched");
                    ImageSlot::Loaded(buffer)
                }
                Err(e) => {
                    warn!(url, error = %e, "image fetch failed");
                    ImageSlot::Failed(e)
                }
            },
        };
        if let Some(progress) = progress {
            progress.inc(1);
        }
        slot
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await
}

/// Progress bar for image fetches.
pub fn fetch_progress(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    progress.set_message("images");
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb([200u8, 120, 40]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(buffer)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_keeps_small_images() {
        let buffer = decode_image(&png_bytes(40, 20), PdfQuality::Medium).unwrap();
        assert_eq!((buffer.width, buffer.height), (40, 20));
        assert_eq!(&buffer.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_decode_downscales_to_quality_width() {
        let buffer = decode_image(&png_bytes(1000, 500), PdfQuality::Low).unwrap();
        assert_eq!(buffer.width, 500);
        assert_eq!(buffer.height, 250);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(b"not an image", PdfQuality::Medium).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    struct EchoFetcher;

    impl ImageFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<PixelBuffer, FetchError> {
            // Later URLs finish first to prove order does not follow completion.
            let delay: u64 = url.trim_start_matches("img").parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50 - delay * 10)).await;
            if url == "img3" {
                return Err(FetchError::Status(404));
            }
            Ok(PixelBuffer { width: delay as u32 + 1, height: 1, jpeg: Vec::new() })
        }
    }

    #[tokio::test]
    async fn test_fetch_ordered_preserves_input_order() {
        let urls = [Some("img0"), None, Some("img2"), Some("img3"), Some("img4")];
        let progress = ProgressBar::hidden();
        let slots = fetch_ordered(&EchoFetcher, &urls, 4, Some(&progress)).await;

        assert_eq!(slots.len(), 5);
        assert!(matches!(slots[0], ImageSlot::Loaded(PixelBuffer { width: 1, .. })));
        assert!(matches!(slots[1], ImageSlot::Missing));
        assert!(matches!(slots[2], ImageSlot::Loaded(PixelBuffer { width: 3, .. })));
        assert!(matches!(slots[3], ImageSlot::Failed(FetchError::Status(404))));
        assert!(matches!(slots[4], ImageSlot::Loaded(PixelBuffer { width: 5, .. })));
        assert_eq!(progress.position(), 5);
    }

    #[tokio::test]
    async fn test_fetch_ordered_with_zero_concurrency() {
        let urls = [Some("img1")];
        let slots = fetch_ordered(&EchoFetcher, &urls, 0, None).await;
        assert!(matches!(slots[0], ImageSlot::Loaded(_)));
    }
}
