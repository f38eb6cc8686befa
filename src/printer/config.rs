//! # Printer Configuration
//!
//! Hardware specifications for supported printers and the per-batch settings
//! the dispatcher applies.
//!
//! ## Supported Printers
//!
//! | Model | Paper | Print width | Dots/line |
//! |-------|-------|-------------|-----------|
//! | Sunmi 58mm | 58 mm | 48 mm | 384 |
//!
//! ## Usage
//!
//! ```
//! use thermal_dispatch::printer::PrinterConfig;
//!
//! let config = PrinterConfig::SUNMI_58MM;
//! assert_eq!(config.width_bytes(), 48);
//! ```

use crate::protocol::codec::CharacterSet;
use crate::protocol::commands::DEFAULT_LINE_SPACING;

/// # Printer Configuration
///
/// Physical characteristics of a thermal printer.
///
/// ```text
/// ├── 5mm ──┼──── 48mm printable ────┼── 5mm ──┤
/// │ margin  │       384 dots         │ margin  │
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Paper roll width in millimeters
    pub paper_width_mm: u16,

    /// Printable width in millimeters
    pub print_width_mm: u16,

    /// Dots per printed line; bitmaps are scaled down to fit
    pub width_dots: u16,
}

impl PrinterConfig {
    /// # Sunmi 58mm Built-in Printer
    pub const SUNMI_58MM: Self = Self {
        name: "Sunmi 58mm",
        paper_width_mm: 58,
        print_width_mm: 48,
        width_dots: 384,
    };

    /// Print width in bytes of packed raster data.
    #[inline]
    pub fn width_bytes(&self) -> u16 {
        self.width_dots.div_ceil(8)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::SUNMI_58MM
    }
}

// ============================================================================
// BATCH SETTINGS
// ============================================================================

/// Commands appended after every batch so the next print starts clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingFeed {
    /// Line spacing restored at the end of the batch, in dots.
    pub line_spacing: i32,

    /// Blank lines fed so the last printed line clears the tear bar.
    pub lines: u16,
}

impl Default for TrailingFeed {
    fn default() -> Self {
        Self {
            line_spacing: DEFAULT_LINE_SPACING,
            lines: 3,
        }
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchConfig {
    /// Code system selected right after the printer is initialized.
    pub character_set: CharacterSet,

    /// Normalization emitted after the last instruction.
    pub trailing: TrailingFeed,
}

// ============================================================================
// TESTS
// ============================================================================
