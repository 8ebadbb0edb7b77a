// SPDX-License-Identifier: MPL-2.0
//! Core raster types for the domain layer.
//!
//! These types represent pure pixel data without any presentation or
//! provider dependencies.

use crate::domain::geometry::BoundingBox;
use std::sync::Arc;

/// Raw image data without presentation dependencies.
///
/// This is the domain representation of an image, containing only the
/// pure pixel data. Infrastructure adapters convert this to and from
/// encoded payloads (PNG, JPEG) at the boundary.
///
/// # Example
///
/// ```
/// use lasso_patch::domain::media::RawImage;
/// use std::sync::Arc;
///
/// let pixels = vec![255u8; 100 * 100 * 4]; // 100x100 RGBA
/// let image = RawImage::new(100, 100, Arc::new(pixels));
///
/// assert_eq!(image.width(), 100);
/// assert_eq!(image.height(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    rgba_bytes: Arc<Vec<u8>>,
}

impl RawImage {
    /// Creates a new `RawImage` from dimensions and RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba_bytes: Arc<Vec<u8>>) -> Self {
        let expected_len = (width as usize) * (height as usize) * 4;
        assert_eq!(
            rgba_bytes.len(),
            expected_len,
            "RGBA data length mismatch: expected {expected_len}, got {}",
            rgba_bytes.len()
        );

        Self {
            width,
            height,
            rgba_bytes,
        }
    }

    /// Creates a new `RawImage` from dimensions and owned RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Self {
        Self::new(width, height, Arc::new(rgba_bytes))
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Returns the shared reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba_bytes)
    }

    /// Returns the total number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl PartialEq for RawImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rgba_bytes == other.rgba_bytes
    }
}

impl Eq for RawImage {}

/// Single-channel mask aligned with an image buffer.
///
/// Each byte holds the edit intensity of one pixel: `0` preserves the
/// original, `255` fully replaces it, intermediate values blend. The
/// buffer is row-major, matching the [`RawImage`] it was rasterized for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Creates a mask from dimensions and intensity data.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match `width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        let expected_len = (width as usize) * (height as usize);
        assert_eq!(
            data.len(),
            expected_len,
            "mask data length mismatch: expected {expected_len}, got {}",
            data.len()
        );

        Self {
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major intensity bytes, one per pixel.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Intensity at a pixel position.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the mask.
    #[must_use]
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width && y < self.height, "mask position out of bounds");
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Returns true when no pixel carries any edit intensity.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&value| value == 0)
    }

    /// Pixel-coordinate box around all nonzero intensities, or `None` for
    /// a blank mask.
    #[allow(clippy::cast_precision_loss)] // Pixel coordinates stay far below f32 precision limits.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            let row = &self.data[(y as usize) * (self.width as usize)..][..self.width as usize];
            for (x, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let x = x as u32;
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((min_x, min_y, max_x, max_y)) => {
                        (min_x.min(x), min_y, max_x.max(x), max_y.max(y))
                    }
                });
            }
        }
        bounds.map(|(min_x, min_y, max_x, max_y)| BoundingBox {
            min_x: min_x as f32,
            min_y: min_y as f32,
            max_x: max_x as f32,
            max_y: max_y as f32,
        })
    }
}

/// An encoded raster payload ready for transport.
///
/// `data` is the standalone base64 text without a `data:` URL prefix;
/// adapters add one where their wire format wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRaster {
    /// MIME type of the encoded bytes, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded raster bytes.
    pub data: String,
}

impl EncodedRaster {
    /// Creates a new `EncodedRaster`.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}
