//! # ESC/POS Text Styling
//!
//! Commands for alignment, emphasis, underline and character size, plus the
//! token parsing for the styling values callers pass by name.
//!
//! ## Character Size
//!
//! `GS ! n` packs two 4-bit magnifications into one byte: the high nibble is
//! the width multiplier minus one, the low nibble the height multiplier minus
//! one. `0x00` is normal size, `0x11` is double width and height.

use std::str::FromStr;

use super::commands::{ESC, GS};
use crate::error::PrinterError;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl FromStr for Alignment {
    type Err = PrinterError;

    /// Case-insensitive `LEFT`, `CENTER` or `RIGHT`. Surrounding whitespace
    /// is not trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LEFT" => Ok(Self::Left),
            "CENTER" => Ok(Self::Center),
            "RIGHT" => Ok(Self::Right),
            _ => Err(PrinterError::invalid(format!(
                "Invalid Alignment \"{s}\": expected LEFT, CENTER or RIGHT"
            ))),
        }
    }
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// ```
/// use thermal_dispatch::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// EMPHASIS (BOLD)
// ============================================================================

/// # Emphasized Printing On (ESC E 1)
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 0x01]
}

/// # Emphasized Printing Off (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0x00]
}

// ============================================================================
// UNDERLINE
// ============================================================================

/// Underline thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineMode {
    /// No underline
    #[default]
    None = 0,
    /// 1-dot underline (`THIN`)
    OneDot = 1,
    /// 2-dot underline (`THICK`)
    TwoDot = 2,
}

impl FromStr for UnderlineMode {
    type Err = PrinterError;

    /// Case-insensitive `THIN`, `THICK` or `NONE`. Surrounding whitespace is
    /// not trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "THIN" => Ok(Self::OneDot),
            "THICK" => Ok(Self::TwoDot),
            "NONE" => Ok(Self::None),
            _ => Err(PrinterError::invalid(format!(
                "Invalid Underline Setting \"{s}\": expected THIN, THICK or NONE"
            ))),
        }
    }
}

/// # Underline Mode (ESC - n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC - n  |
/// | Hex     | 1B 2D n  |
///
/// - `n = 0`: off
/// - `n = 1`: 1-dot thick
/// - `n = 2`: 2-dot thick
pub fn underline(mode: UnderlineMode) -> Vec<u8> {
    vec![ESC, b'-', mode as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// # Select Character Size (GS ! n)
///
/// `n` is the already-packed size byte, see [`size_byte`].
///
/// | Format  | Bytes   |
/// |---------|---------|
/// | ASCII   | GS ! n  |
/// | Hex     | 1D 21 n |
#[inline]
pub fn font_size(n: u8) -> Vec<u8> {
    vec![GS, b'!', n]
}

/// Pack width and height multipliers (each 1-16) into a `GS !` size byte.
///
/// Callers clamp before packing; values outside 1-16 are masked to a nibble.
///
/// ```
/// use thermal_dispatch::protocol::text::size_byte;
///
/// assert_eq!(size_byte(1, 1), 0x00);
/// assert_eq!(size_byte(2, 2), 0x11);
/// assert_eq!(size_byte(16, 16), 0xFF);
/// ```
#[inline]
pub const fn size_byte(width: u8, height: u8) -> u8 {
    ((width.wrapping_sub(1) & 0x0F) << 4) | (height.wrapping_sub(1) % 16)
}

// ============================================================================
// TESTS
// ============================================================================
