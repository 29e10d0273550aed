//! JPEG payload encoding under a byte budget.
//!
//! Encode once at the initial quality. While the result is over budget
//! and quality is above the floor, shrink both sides by
//! `sqrt(budget / size) * safety`, drop quality by one step, re-encode.
//! The last attempt is returned even if it is still over budget.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::RgbImage;
use tracing::debug;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::errors::{EmbeddingError, LookalikeResult};
use lookalike_core::models::ImagePayload;

#[derive(Debug, Clone)]
pub struct PayloadEncoder {
    max_payload_bytes: usize,
    initial_quality: u8,
    quality_step: u8,
    min_quality: u8,
    downscale_safety: f64,
}

impl PayloadEncoder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            max_payload_bytes: config.max_payload_bytes,
            initial_quality: config.initial_quality,
            quality_step: config.quality_step,
            min_quality: config.min_quality,
            downscale_safety: config.downscale_safety,
        }
    }

    /// Override the byte budget.
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    /// Decode `bytes`, convert to RGB and encode as a base64 JPEG data URI.
    pub fn encode(&self, bytes: &[u8]) -> LookalikeResult<ImagePayload> {
        let decoded = image::load_from_memory(bytes).map_err(|e| EmbeddingError::InvalidImage {
            reason: e.to_string(),
        })?;
        let mut rgb = decoded.to_rgb8();
        let mut quality = self.initial_quality;
        let mut jpeg = encode_jpeg(&rgb, quality)?;

        while jpeg.len() > self.max_payload_bytes && quality > self.min_quality {
            let scale =
                (self.max_payload_bytes as f64 / jpeg.len() as f64).sqrt() * self.downscale_safety;
            let width = ((rgb.width() as f64 * scale) as u32).max(1);
            let height = ((rgb.height() as f64 * scale) as u32).max(1);
            rgb = image::imageops::resize(&rgb, width, height, FilterType::Lanczos3);
            quality = quality
                .saturating_sub(self.quality_step)
                .max(self.min_quality);
            jpeg = encode_jpeg(&rgb, quality)?;
            debug!(
                width,
                height,
                quality,
                bytes = jpeg.len(),
                "payload downscaled"
            );
        }

        Ok(ImagePayload {
            data_uri: format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)),
            encoded_bytes: jpeg.len(),
            width: rgb.width(),
            height: rgb.height(),
            quality,
        })
    }
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> LookalikeResult<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(rgb)
        .map_err(|e| EmbeddingError::EncodingFailed {
            reason: e.to_string(),
        })?;
    Ok(out)
}
