//! # Printer Commands
//!
//! Typed requests accepted by [`PrinterState::apply`](super::PrinterState::apply).
//! Each named instruction parses into exactly one variant, carrying its own
//! argument struct. Optional arguments stay `None` here and are resolved
//! against the current state during the transition.

use crate::protocol::codec::CharacterSet;
use crate::protocol::text::{Alignment, UnderlineMode};
use crate::render::Bitmap;

/// A validated request against the printer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the code system used for subsequent text.
    SetCharacterSet(CharacterSet),
    Align(AlignArgs),
    Barcode(BarcodeArgs),
    Bitmap(BitmapArgs),
    Bold(BoldArgs),
    Darkness(DarknessArgs),
    FontSize(FontSizeArgs),
    LineSpacing(LineSpacingArgs),
    NewLine(NewLineArgs),
    /// Text without a line feed.
    Print(TextArgs),
    /// Text followed by one line feed.
    Println(TextArgs),
    Qr(QrArgs),
    Qr2(Qr2Args),
    Underline(UnderlineArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignArgs {
    pub alignment: Alignment,
}

/// 1D barcode. Symbology, height, width and text position are forwarded to
/// the encoder untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeArgs {
    pub data: String,
    pub symbology: i32,
    pub height: i32,
    pub width: i32,
    pub text_position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapArgs {
    pub bitmap: Bitmap,
}

/// `None` toggles the current bold flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoldArgs {
    pub value: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DarknessArgs {
    pub level: i32,
}

/// Character magnification. Both axes are clamped to `1..=16`, so any
/// integer is accepted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizeArgs {
    pub width: i64,
    pub height: i64,
}

/// `None` restores the default spacing of 30 dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSpacingArgs {
    pub value: Option<i32>,
}

/// `None` feeds a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NewLineArgs {
    pub count: Option<u16>,
}

/// Absent and empty text both print nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextArgs {
    pub text: Option<String>,
}

impl TextArgs {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrArgs {
    pub data: String,
    pub module_size: i32,
    pub error_level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qr2Args {
    pub first: String,
    pub second: String,
    pub module_size: i32,
    pub error_level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderlineArgs {
    pub mode: UnderlineMode,
}
