//! # Bitmap Decoding
//!
//! Turns encoded image bytes (PNG, JPEG, ...) into a printer-ready 1-bit
//! [`Bitmap`]: decode, shrink to the printable width, flatten alpha onto
//! white paper, then dither.

use image::imageops::FilterType;
use tracing::debug;

use super::dither;
use crate::error::PrinterError;

/// Alpha below this is treated as paper.
const ALPHA_CUTOFF: u8 = 128;

/// A packed 1-bit raster image.
///
/// Rows are `width_bytes()` long, MSB = leftmost dot, 1 = black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap already-packed raster data.
    ///
    /// Fails when `data` is not exactly `ceil(width / 8) * height` bytes.
    pub fn new(width: u16, height: u16, data: Vec<u8>) -> Result<Self, PrinterError> {
        let expected = usize::from(width.div_ceil(8)) * usize::from(height);
        if data.len() != expected {
            return Err(PrinterError::invalid(format!(
                "bitmap {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in dots.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in dots.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per raster row.
    pub fn width_bytes(&self) -> u16 {
        self.width.div_ceil(8)
    }

    /// Packed raster data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Decode an encoded image into a bitmap no wider than `max_width` dots.
///
/// Wider images are scaled down preserving aspect ratio; narrower images
/// keep their size. Undecodable data is an invalid argument.
pub fn decode(raw: &[u8], max_width: u16) -> Result<Bitmap, PrinterError> {
    let mut image = image::load_from_memory(raw)
        .map_err(|e| PrinterError::invalid(format!("cannot decode bitmap: {e}")))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(PrinterError::invalid("bitmap has no pixels"));
    }

    if image.width() > u32::from(max_width) {
        debug!(
            from = image.width(),
            to = max_width,
            "scaling bitmap to printable width"
        );
        image = image.resize(u32::from(max_width), u32::MAX, FilterType::Triangle);
    }

    let width = u16::try_from(image.width())
        .map_err(|_| PrinterError::invalid("bitmap is too wide"))?;
    let height = u16::try_from(image.height())
        .map_err(|_| PrinterError::invalid("bitmap is too tall"))?;

    let gray = image.to_luma_alpha8();
    let data = dither::generate_raster(usize::from(width), usize::from(height), |x, y| {
        // x < width and y < height, both fit in u32
        let [luma, alpha] = gray.get_pixel(x as u32, y as u32).0;
        if alpha < ALPHA_CUTOFF {
            0.0
        } else {
            1.0 - f32::from(luma) / 255.0
        }
    });

    Bitmap::new(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, LumaA, GrayImage, GrayAlphaImage, DynamicImage};
    use std::io::Cursor;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_new_checks_length() {
        assert!(Bitmap::new(9, 2, vec![0; 4]).is_ok());
        assert!(Bitmap::new(9, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_decode_black_square() {
        let img = GrayImage::from_pixel(16, 4, Luma([0]));
        let bitmap = decode(&png_bytes(DynamicImage::ImageLuma8(img)), 384).unwrap();
        assert_eq!(bitmap.width(), 16);
        assert_eq!(bitmap.height(), 4);
        assert_eq!(bitmap.width_bytes(), 2);
        assert_eq!(bitmap.data(), &[0xFF; 8]);
    }

    #[test]
    fn test_decode_white_is_blank() {
        let img = GrayImage::from_pixel(8, 8, Luma([255]));
        let bitmap = decode(&png_bytes(DynamicImage::ImageLuma8(img)), 384).unwrap();
        assert!(bitmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_transparent_is_blank() {
        let img = GrayAlphaImage::from_pixel(8, 2, LumaA([0, 0]));
        let bitmap = decode(&png_bytes(DynamicImage::ImageLumaA8(img)), 384).unwrap();
        assert_eq!(bitmap.data(), &[0x00, 0x00]);
    }

    #[test]
    fn test_decode_scales_to_max_width() {
        let img = GrayImage::from_pixel(800, 400, Luma([0]));
        let bitmap = decode(&png_bytes(DynamicImage::ImageLuma8(img)), 384).unwrap();
        assert_eq!(bitmap.width(), 384);
        assert_eq!(bitmap.height(), 192);
    }

    #[test]
    fn test_decode_garbage_is_invalid_argument() {
        let err = decode(b"not an image", 384).unwrap_err();
        assert!(matches!(err, PrinterError::InvalidArgument(_)));
    }
}
