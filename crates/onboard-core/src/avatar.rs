//! Avatar image domain types.
//!
//! Format sniffing, crop parameters and the normalized-image value passed
//! between the picker, the crop step and the upload call. Pixel work lives
//! behind [`crate::ports::ImageCodecPort`]; this module is pure.

use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Lower zoom bound for the crop viewport.
pub const MIN_ZOOM: f32 = 1.0;
/// Upper zoom bound for the crop viewport.
pub const MAX_ZOOM: f32 = 3.0;

/// Accepted avatar source formats.
///
/// 头像源图片格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarFormat {
    Jpeg,
    Png,
    Webp,
    Avif,
}

impl AvatarFormat {
    /// Identify the format from magic bytes, or `None` if the payload is
    /// not one of the accepted formats.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }
        if bytes.len() >= 12
            && &bytes[4..8] == b"ftyp"
            && (&bytes[8..12] == b"avif" || &bytes[8..12] == b"avis")
        {
            return Some(Self::Avif);
        }
        None
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Avif => "image/avif",
        }
    }
}

/// Quarter-turn rotation applied before cropping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropRotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

/// Crop parameters chosen interactively by the user.
///
/// 用户交互选择的裁剪参数。
///
/// The aspect ratio is fixed at 1:1; `center_x`/`center_y` are fractions of
/// the source dimensions. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    pub zoom: f32,
    pub rotation: CropRotation,
    pub center_x: f32,
    pub center_y: f32,
}

impl Default for CropSpec {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            rotation: CropRotation::None,
            center_x: 0.5,
            center_y: 0.5,
        }
    }
}

impl CropSpec {
    /// Clamp zoom into `[MIN_ZOOM, MAX_ZOOM]` and the center into the unit
    /// square.
    pub fn clamped(self) -> Self {
        Self {
            zoom: self.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            rotation: self.rotation,
            center_x: self.center_x.clamp(0.0, 1.0),
            center_y: self.center_y.clamp(0.0, 1.0),
        }
    }
}

/// An orientation-normalized image, re-encoded as PNG.
///
/// 方向归一化后的图片（PNG 编码）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedImage {
    #[serde(skip)]
    pub png: Bytes,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    /// Displayable `data:` URL for the normalized image.
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// Cropped avatar held on the picture step: the blob that will be uploaded
/// plus a displayable URL for the preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarPreview {
    #[serde(skip)]
    pub png: Bytes,
    pub data_url: String,
}

impl AvatarPreview {
    pub fn from_png(png: Bytes) -> Self {
        let data_url = png_data_url(&png);
        Self { png, data_url }
    }
}

fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}
