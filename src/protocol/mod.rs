//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for ESC/POS thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: init, code system, line feed, line spacing, darkness
//! - [`text`]: alignment, bold, underline, character size
//! - [`barcode`]: QR codes and 1D barcodes
//! - [`graphics`]: raster bit images
//! - [`codec`]: text encoding per character set
//!
//! ## Usage Example
//!
//! ```
//! use thermal_dispatch::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(text::bold_on());
//! data.extend(b"RECEIPT");
//! data.extend(commands::next_line(1));
//! data.extend(text::bold_off());
//! ```

pub mod barcode;
pub mod codec;
pub mod commands;
pub mod graphics;
pub mod text;
