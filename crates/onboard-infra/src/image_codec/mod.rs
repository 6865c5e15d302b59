//! Avatar image codec backed by the `image` crate.
//!
//! 基于 `image` crate 的头像编解码实现。
//!
//! Normalization sniffs the format, decodes, bakes the EXIF orientation
//! into the pixels (JPEG only) and re-encodes as PNG so every later step
//! works on a single format. Cropping takes the largest square the zoom
//! allows, centered on the user's chosen point, and scales it to the
//! fixed avatar edge.

mod exif;

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use onboard_core::avatar::{AvatarFormat, CropRotation, CropSpec, NormalizedImage};
use onboard_core::ports::{ImageCodecError, ImageCodecPort};

/// Edge length of the final square avatar in pixels.
pub const AVATAR_EDGE: u32 = 256;

#[derive(Debug, Default, Clone)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodecPort for ImageCodec {
    fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, ImageCodecError> {
        let format = AvatarFormat::sniff(bytes).ok_or(ImageCodecError::UnsupportedFormat)?;

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ImageCodecError::Decode(e.to_string()))?;

        let oriented = if format == AvatarFormat::Jpeg {
            match exif::jpeg_orientation(bytes) {
                Some(orientation) => apply_orientation(decoded, orientation),
                None => decoded,
            }
        } else {
            decoded
        };

        let (width, height) = (oriented.width(), oriented.height());
        let png = encode_png(&oriented)?;
        Ok(NormalizedImage { png, width, height })
    }

    fn crop(&self, image: &NormalizedImage, spec: &CropSpec) -> Result<Bytes, ImageCodecError> {
        let decoded = image::load_from_memory_with_format(&image.png, ImageFormat::Png)
            .map_err(|e| ImageCodecError::Decode(e.to_string()))?;
        let spec = spec.clamped();

        let rotated = match spec.rotation {
            CropRotation::None => decoded,
            CropRotation::Quarter => decoded.rotate90(),
            CropRotation::Half => decoded.rotate180(),
            CropRotation::ThreeQuarter => decoded.rotate270(),
        };

        let (w, h) = (rotated.width(), rotated.height());
        // Largest square at zoom 1, shrinking as the user zooms in.
        let side = ((w.min(h) as f32 / spec.zoom) as u32).max(1);

        let cx = spec.center_x * w as f32;
        let cy = spec.center_y * h as f32;
        let x = (cx - side as f32 / 2.0)
            .clamp(0.0, (w - side.min(w)) as f32)
            .round() as u32;
        let y = (cy - side as f32 / 2.0)
            .clamp(0.0, (h - side.min(h)) as f32)
            .round() as u32;

        let square = rotated.crop_imm(x, y, side.min(w), side.min(h));
        let avatar = square.resize_exact(AVATAR_EDGE, AVATAR_EDGE, FilterType::Triangle);
        encode_png(&avatar)
    }
}

/// Bake an EXIF orientation into the pixel data. Values per the EXIF spec;
/// 1 is identity.
fn apply_orientation(image: DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

fn encode_png(image: &DynamicImage) -> Result<Bytes, ImageCodecError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| ImageCodecError::Encode(e.to_string()))?;
    Ok(Bytes::from(buf.into_inner()))
}
