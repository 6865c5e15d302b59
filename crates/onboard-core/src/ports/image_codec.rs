//! Image codec port.
//!
//! Orientation normalization and cropping are pure pixel work; they sit
//! behind a port so the domain stays free of image-library types.

use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

use crate::avatar::{CropSpec, NormalizedImage};

/// Codec failures. All recoverable: the user returns to the picker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageCodecError {
    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),
}

pub trait ImageCodecPort: Send + Sync {
    /// Sniff, decode and orientation-normalize an uploaded file into a
    /// displayable PNG.
    fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, ImageCodecError>;

    /// Apply the crop spec (1:1 aspect, clamped zoom, quarter-turn
    /// rotation) and encode the result as a PNG blob.
    fn crop(&self, image: &NormalizedImage, spec: &CropSpec) -> Result<Bytes, ImageCodecError>;
}

impl<T: ImageCodecPort + ?Sized> ImageCodecPort for Arc<T> {
    fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, ImageCodecError> {
        (**self).normalize(bytes)
    }

    fn crop(&self, image: &NormalizedImage, spec: &CropSpec) -> Result<Bytes, ImageCodecError> {
        (**self).crop(image, spec)
    }
}
