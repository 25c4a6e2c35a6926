//! Image dimension decoding seam.
//!
//! Only pixel dimensions matter for tile pricing, so the default decoder
//! reads just the image header rather than decoding pixel data.

use crate::error::{Error, Result};
use std::io::Cursor;
use std::sync::Arc;

/// Resolves raw image bytes into pixel dimensions.
pub trait ImageDecoder: Send + Sync {
    /// Decode `(width, height)` in pixels from raw image bytes.
    ///
    /// Fails with [`Error::ImageDecode`] on corrupt or unrecognized
    /// input.
    fn dimensions(&self, data: &[u8]) -> Result<(u32, u32)>;
}

/// Default decoder backed by the `image` crate's format sniffing.
///
/// Handles JPEG, PNG, GIF, BMP, TIFF and WebP payloads, which covers
/// DCTDecode streams and pre-rendered page images. Raw PDF pixel
/// streams without a standard container are reported as undecodable.
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelDecoder;

impl PixelDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Wrap the decoder for sharing across aggregators.
    pub fn shared(self) -> Arc<dyn ImageDecoder> {
        Arc::new(self)
    }
}

impl ImageDecoder for PixelDecoder {
    fn dimensions(&self, data: &[u8]) -> Result<(u32, u32)> {
        image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| Error::ImageDecode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| Error::ImageDecode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decodes_png_dimensions() {
        let decoder = PixelDecoder::new();
        let (w, h) = decoder.dimensions(&png_bytes(2, 3)).unwrap();
        assert_eq!((w, h), (2, 3));
    }

    #[test]
    fn test_rejects_garbage() {
        let decoder = PixelDecoder::new();
        let result = decoder.dimensions(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        let decoder = PixelDecoder::new();
        assert!(decoder.dimensions(&[]).is_err());
    }
}
