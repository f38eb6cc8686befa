//! # ESC/POS Raster Graphics
//!
//! Bitmaps are printed with the raster bit image command `GS v 0`.
//!
//! ## Data Layout
//!
//! Row by row, each byte is 8 horizontal dots, MSB = leftmost dot:
//!
//! ```text
//! Row 0:    d[0]      d[1]      ... d[width-1]
//! Row 1:    d[width]  d[width+1] ... d[2*width-1]
//! ```

use super::commands::{GS, u16_le};
use crate::render::Bitmap;

/// Maximum rows per raster command.
///
/// Long images are split so the printer's receive buffer is not overrun on
/// slow links.
pub const MAX_CHUNK_ROWS: u16 = 256;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// - `m`: 0 = normal density
/// - `xL, xH`: width in bytes, little-endian
/// - `yL, yH`: height in dots, little-endian
///
/// ```
/// use thermal_dispatch::protocol::graphics;
///
/// let cmd = graphics::raster(16, 2, &[0xFF, 0x00, 0xAA, 0x55]);
/// assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 2, 0]);
/// assert_eq!(&cmd[8..], &[0xFF, 0x00, 0xAA, 0x55]);
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);
    debug_assert_eq!(
        data.len(),
        usize::from(width_bytes) * usize::from(height),
        "raster data length mismatch"
    );

    let [x_l, x_h] = u16_le(width_bytes);
    let [y_l, y_h] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend([GS, b'v', b'0', 0x00, x_l, x_h, y_l, y_h]);
    cmd.extend_from_slice(data);
    cmd
}

/// Print a bitmap as a series of raster commands of at most
/// [`MAX_CHUNK_ROWS`] rows each.
pub fn bitmap(image: &Bitmap) -> Vec<u8> {
    let width_bytes = usize::from(image.width_bytes());
    let mut out = Vec::with_capacity(image.data().len() + 8);

    let mut row_offset: u16 = 0;
    while row_offset < image.height() {
        let chunk_rows = (image.height() - row_offset).min(MAX_CHUNK_ROWS);
        let start = usize::from(row_offset) * width_bytes;
        let end = start + usize::from(chunk_rows) * width_bytes;
        out.extend(raster(image.width(), chunk_rows, &image.data()[start..end]));
        row_offset += chunk_rows;
    }

    out
}
