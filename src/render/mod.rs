//! # Rendering
//!
//! Image preparation for the printer: decoding encoded image bytes and
//! reducing them to a 1-bit raster.
//!
//! - [`bitmap`]: image decoding and the [`Bitmap`] raster type
//! - [`dither`]: Bayer 8×8 ordered dithering and bit packing

pub mod bitmap;
pub mod dither;

pub use bitmap::Bitmap;
