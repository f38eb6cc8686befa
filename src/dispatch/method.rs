//! The closed table of instruction names.

use std::fmt;
use std::str::FromStr;

use crate::error::PrinterError;

/// Every instruction name the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Align,
    Barcode,
    Bitmap,
    Bold,
    Darkness,
    FontSize,
    LineSpacing,
    NewLine,
    Print,
    Println,
    Qr,
    Qr2,
    Underline,
}

impl Method {
    pub const ALL: [Method; 13] = [
        Method::Align,
        Method::Barcode,
        Method::Bitmap,
        Method::Bold,
        Method::Darkness,
        Method::FontSize,
        Method::LineSpacing,
        Method::NewLine,
        Method::Print,
        Method::Println,
        Method::Qr,
        Method::Qr2,
        Method::Underline,
    ];

    /// The wire name, exactly as callers spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Align => "align",
            Method::Barcode => "barcode",
            Method::Bitmap => "bitmap",
            Method::Bold => "bold",
            Method::Darkness => "darkness",
            Method::FontSize => "fontSize",
            Method::LineSpacing => "lineSpacing",
            Method::NewLine => "newLine",
            Method::Print => "print",
            Method::Println => "println",
            Method::Qr => "qr",
            Method::Qr2 => "qr2",
            Method::Underline => "underline",
        }
    }

    /// Number of positional parameter slots. Optional values still occupy
    /// their slot, as `null`.
    pub fn arity(self) -> usize {
        match self {
            Method::Align
            | Method::Bitmap
            | Method::Bold
            | Method::Darkness
            | Method::LineSpacing
            | Method::NewLine
            | Method::Print
            | Method::Println
            | Method::Underline => 1,
            Method::FontSize => 2,
            Method::Qr => 3,
            Method::Qr2 => 4,
            Method::Barcode => 5,
        }
    }

    /// Human-readable parameter list for `methods` output.
    pub fn signature(self) -> &'static str {
        match self {
            Method::Align => "alignment: LEFT | CENTER | RIGHT",
            Method::Barcode => "data, symbology: int, height: int, width: int, textPos: int",
            Method::Bitmap => "image: bytes | base64",
            Method::Bold => "value: bool | null",
            Method::Darkness => "level: int",
            Method::FontSize => "width: int, height: int",
            Method::LineSpacing => "value: int | null",
            Method::NewLine => "count: int | null",
            Method::Print | Method::Println => "text: string | null",
            Method::Qr => "data, moduleSize: int, errorLevel: int",
            Method::Qr2 => "data1, data2, moduleSize: int, errorLevel: int",
            Method::Underline => "mode: THIN | THICK | NONE",
        }
    }
}

impl FromStr for Method {
    type Err = PrinterError;

    /// Names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| PrinterError::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
