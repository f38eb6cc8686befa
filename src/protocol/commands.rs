//! # ESC/POS Control Commands
//!
//! Printer control commands that are not tied to text styling: initialization,
//! code system selection, paper feed, line spacing and print density.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC 3 n`, `FS C n`, `GS ( E pL pH ...`
//!
//! ## Byte Order
//!
//! Multi-byte length prefixes (`pL pH`) are **little-endian**. The density
//! value of `GS ( E` is sent high byte first.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, barcodes, QR codes and raster graphics.
pub const GS: u8 = 0x1D;

/// FS (File Separator) - Multi-byte character command prefix
pub const FS: u8 = 0x1C;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// Line spacing applied when no explicit value is given, in dots.
pub const DEFAULT_LINE_SPACING: i32 = 30;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text formatting, alignment and line
/// spacing to their power-on defaults.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use thermal_dispatch::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Code System (FS C n)
///
/// Selects how multi-byte text is interpreted by the printer.
///
/// | n    | Code system |
/// |------|-------------|
/// | 0x00 | GB18030     |
/// | 0x01 | BIG5        |
/// | 0x02 | KSC5601     |
/// | 0xFF | UTF-8       |
#[inline]
pub fn set_code_system(n: u8) -> Vec<u8> {
    vec![FS, b'C', n]
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// # Next Line (LF × n)
///
/// Prints the line buffer and advances `count` lines. A count of zero
/// produces no bytes.
///
/// ```
/// use thermal_dispatch::protocol::commands;
///
/// assert_eq!(commands::next_line(3), vec![0x0A, 0x0A, 0x0A]);
/// ```
#[inline]
pub fn next_line(count: u16) -> Vec<u8> {
    vec![LF; usize::from(count)]
}

/// # Set Line Spacing (ESC 3 n)
///
/// Sets the line feed amount to `n` dots. Only the low byte of `value` is
/// sent, which matches how the device firmware reads the parameter.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC 3 n  |
/// | Hex     | 1B 33 n  |
#[inline]
pub fn line_spacing(value: i32) -> Vec<u8> {
    vec![ESC, b'3', low_byte(value)]
}

// ============================================================================
// PRINT DENSITY
// ============================================================================

/// # Set Print Darkness (GS ( E pL pH fn a d1 d2)
///
/// Sets the print density. The level is passed through as a 16-bit value,
/// high byte first; its interpretation is up to the device.
///
/// | Format  | Bytes                       |
/// |---------|-----------------------------|
/// | Hex     | 1D 28 45 04 00 05 05 d1 d2  |
pub fn darkness(level: i32) -> Vec<u8> {
    vec![
        GS,
        b'(',
        b'E',
        0x04,
        0x00,
        0x05,
        0x05,
        low_byte(level >> 8),
        low_byte(level),
    ]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Keep only the least significant byte of a parameter.
///
/// ESC/POS parameters are single bytes; wider values wrap the same way the
/// device would read them.
#[inline]
pub const fn low_byte(value: i32) -> u8 {
    (value & 0xFF) as u8
}

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use thermal_dispatch::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
