//! # Ordered Dithering
//!
//! Thermal printers print a dot or nothing. Grayscale images are reduced to
//! 1-bit with an 8×8 Bayer matrix, which keeps the output deterministic and
//! free of the worm artifacts error diffusion leaves on receipt paper.
//!
//! ## Intensity Convention
//!
//! Intensity runs from 0.0 (white, no dot) to 1.0 (black, dot printed).

/// 8×8 Bayer threshold matrix (values 0-63).
const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Dithering threshold for a pixel position, in (0, 1).
///
/// `(matrix_value + 0.5) / 64` never reaches 0 or 1, so full black always
/// prints and full white never does.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (f32::from(matrix_value) + 0.5) / 64.0
}

/// Whether a dot is printed at `(x, y)` for the given intensity.
///
/// ```
/// use thermal_dispatch::render::dither::should_print;
///
/// assert!(should_print(0, 0, 1.0));
/// assert!(!should_print(0, 0, 0.0));
/// ```
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Pack a row of pixels into bytes, MSB = leftmost pixel, 1 = black.
///
/// The last byte is padded with white on the right.
///
/// ```
/// use thermal_dispatch::render::dither::pack_row;
///
/// assert_eq!(pack_row(&[true, true, true, true, false, false, false, false]), vec![0xF0]);
/// assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// Dither an intensity function into packed raster rows.
///
/// Length of the result is `ceil(width / 8) * height`.
pub fn generate_raster<F>(width: usize, height: usize, intensity_fn: F) -> Vec<u8>
where
    F: Fn(usize, usize) -> f32,
{
    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    let mut row = Vec::with_capacity(width);

    for y in 0..height {
        row.clear();
        row.extend((0..width).map(|x| should_print(x, y, intensity_fn(x, y))));
        data.extend(pack_row(&row));
    }

    data
}
