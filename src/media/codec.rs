// SPDX-License-Identifier: MPL-2.0
//! Raster payload conversion between domain types and encoded transports.
//!
//! Providers exchange base64-encoded PNG payloads; sessions work on raw
//! RGBA buffers. This module converts between the two, expands masks into
//! provider-friendly black-and-white frames, and resamples provider
//! output back onto the working dimensions.

use crate::domain::media::{EncodedRaster, Mask, RawImage};
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image_rs::imageops::FilterType;
use image_rs::{ImageError, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// MIME type attached to every payload produced here.
pub const PNG_MIME: &str = "image/png";

/// Encodes an image as a base64 PNG payload.
///
/// # Errors
///
/// Returns [`Error::Image`] when PNG encoding fails.
pub fn encode_png(image: &RawImage) -> Result<EncodedRaster> {
    let buffer = RgbaImage::from_raw(
        image.width(),
        image.height(),
        image.rgba_bytes().to_vec(),
    )
    .ok_or_else(|| Error::Image("RGBA buffer size mismatch".to_string()))?;

    let mut bytes = Vec::new();
    buffer.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(EncodedRaster::new(PNG_MIME, BASE64.encode(bytes)))
}

/// Decodes a base64 raster payload into raw RGBA pixels.
///
/// # Errors
///
/// Returns [`Error::Image`] when the base64 text or the encoded raster
/// is malformed.
pub fn decode(raster: &EncodedRaster) -> Result<RawImage> {
    let bytes = BASE64
        .decode(&raster.data)
        .map_err(|err| Error::Image(format!("invalid base64 payload: {err}")))?;
    let decoded = image_rs::load_from_memory(&bytes)?;
    let rgba = decoded.to_rgba8();
    Ok(RawImage::from_rgba(
        decoded.width(),
        decoded.height(),
        rgba.into_raw(),
    ))
}

/// Renders a mask as white-on-black PNG bytes.
///
/// Intensities expand into all three color channels with full alpha, the
/// shape providers and preview files both expect.
///
/// # Errors
///
/// Returns [`Error::Image`] when PNG encoding fails.
pub fn mask_png_bytes(mask: &Mask) -> Result<Vec<u8>> {
    let mut rgba = Vec::with_capacity(mask.data().len() * 4);
    for &value in mask.data() {
        rgba.extend_from_slice(&[value, value, value, 255]);
    }
    let buffer = RgbaImage::from_raw(mask.width(), mask.height(), rgba)
        .ok_or_else(|| Error::Image("mask buffer size mismatch".to_string()))?;

    let mut bytes = Vec::new();
    buffer.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encodes a mask as a base64 PNG payload.
///
/// # Errors
///
/// Returns [`Error::Image`] when PNG encoding fails.
pub fn encode_mask(mask: &Mask) -> Result<EncodedRaster> {
    Ok(EncodedRaster::new(
        PNG_MIME,
        BASE64.encode(mask_png_bytes(mask)?),
    ))
}

/// Formats a payload as a `data:` URL.
#[must_use]
pub fn to_data_url(raster: &EncodedRaster) -> String {
    format!("data:{};base64,{}", raster.mime_type, raster.data)
}

/// Resamples an image to exact target dimensions with Lanczos filtering.
///
/// Used to bring provider output back onto the working canvas when the
/// backend rounds dimensions.
///
/// # Errors
///
/// Returns [`Error::Image`] when the source buffer is inconsistent.
pub fn resample(image: &RawImage, width: u32, height: u32) -> Result<RawImage> {
    if (image.width(), image.height()) == (width, height) {
        return Ok(image.clone());
    }
    let buffer = RgbaImage::from_raw(
        image.width(),
        image.height(),
        image.rgba_bytes().to_vec(),
    )
    .ok_or_else(|| Error::Image("RGBA buffer size mismatch".to_string()))?;
    let resized = image_rs::imageops::resize(&buffer, width, height, FilterType::Lanczos3);
    Ok(RawImage::from_rgba(width, height, resized.into_raw()))
}

/// Writes an image to disk; the format follows the file extension.
///
/// # Errors
///
/// Returns [`Error::Image`] when encoding or writing fails.
pub fn save_image(image: &RawImage, path: &Path) -> Result<()> {
    let buffer = RgbaImage::from_raw(
        image.width(),
        image.height(),
        image.rgba_bytes().to_vec(),
    )
    .ok_or_else(|| Error::Image("RGBA buffer size mismatch".to_string()))?;
    buffer.save(path)?;
    Ok(())
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn checker(width: u32, height: u32) -> RawImage {
        let mut bytes = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let value = if (x + y) % 2 == 0 { 255 } else { 0 };
                bytes.extend_from_slice(&[value, value, value, 255]);
            }
        }
        RawImage::from_rgba(width, height, bytes)
    }

    #[test]
    fn encode_then_decode_preserves_pixels() {
        let image = checker(8, 6);
        let encoded = encode_png(&image).unwrap();
        assert_eq!(encoded.mime_type, PNG_MIME);

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let raster = EncodedRaster::new(PNG_MIME, "@@not base64@@");
        match decode(&raster) {
            Err(Error::Image(msg)) => assert!(msg.contains("base64")),
            other => panic!("expected Image error, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_non_image_payload() {
        let raster = EncodedRaster::new(PNG_MIME, BASE64.encode(b"plain text"));
        match decode(&raster) {
            Err(Error::Image(_)) => {}
            other => panic!("expected Image error, got {other:?}"),
        }
    }

    #[test]
    fn mask_expands_to_white_on_black() {
        let mut data = vec![0u8; 4 * 4];
        data[5] = 200;
        let mask = Mask::new(4, 4, data);

        let bytes = mask_png_bytes(&mask).unwrap();
        let decoded = image_rs::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [200, 200, 200, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn data_url_carries_mime_and_payload() {
        let raster = EncodedRaster::new(PNG_MIME, "QUJD");
        assert_eq!(to_data_url(&raster), "data:image/png;base64,QUJD");
    }

    #[test]
    fn resample_matches_requested_dimensions() {
        let image = checker(16, 16);
        let resized = resample(&image, 8, 4).unwrap();
        assert_eq!((resized.width(), resized.height()), (8, 4));
        assert_eq!(resized.rgba_bytes().len(), 8 * 4 * 4);
    }

    #[test]
    fn resample_is_identity_at_same_dimensions() {
        let image = checker(8, 8);
        let resized = resample(&image, 8, 8).unwrap();
        assert_eq!(resized, image);
    }

    #[test]
    fn save_image_writes_a_decodable_png() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.png");
        let image = checker(8, 8);

        save_image(&image, &path).unwrap();
        let reloaded = image_rs::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (8, 8));
        assert_eq!(reloaded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
