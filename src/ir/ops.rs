//! # IR Opcodes
//!
//! The closed set of logical printer operations. Every state change the
//! session makes is expressed as one `Op`, and every `Op` compiles to exactly
//! one byte sequence through an [`Encoder`](super::Encoder).
//!
//! ```text
//! Instruction → Command → PrinterState::apply → Op → Encoder → bytes → Transport
//! ```

use crate::protocol::codec::CharacterSet;
use crate::protocol::text::{Alignment, UnderlineMode};
use crate::render::Bitmap;

/// IR opcodes - one per protocol-level action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    // ========== Printer Control ==========
    /// Initialize printer (ESC @).
    Init,

    /// Select the code system used to interpret text bytes.
    SetCodeSystem(CharacterSet),

    /// Line spacing in dots.
    LineSpacing(i32),

    /// Print density, passed through to the device.
    SetDarkness(i32),

    // ========== Style Changes ==========
    /// Bold on or off.
    SetBold(bool),

    /// Underline thickness.
    SetUnderline(UnderlineMode),

    /// Packed character size byte (high nibble width-1, low nibble height-1).
    SetFontSize(u8),

    /// Text justification.
    SetAlign(Alignment),

    // ========== Content ==========
    /// Text, encoded with `charset` at encode time. No trailing newline.
    Print { text: String, charset: CharacterSet },

    /// Advance `count` lines.
    NextLine(u16),

    // ========== Barcodes ==========
    /// Single QR code.
    PrintQr {
        data: String,
        module_size: i32,
        error_level: i32,
    },

    /// Two QR codes side by side.
    PrintQr2 {
        first: String,
        second: String,
        module_size: i32,
        error_level: i32,
    },

    /// 1D barcode.
    PrintBarcode {
        data: String,
        symbology: i32,
        height: i32,
        width: i32,
        text_position: i32,
    },

    // ========== Graphics ==========
    /// Decoded 1-bit image.
    PrintBitmap(Bitmap),
}

impl Op {
    /// Short name for logs and journals, without the payload.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Init => "Init",
            Op::SetCodeSystem(_) => "SetCodeSystem",
            Op::LineSpacing(_) => "LineSpacing",
            Op::SetDarkness(_) => "SetDarkness",
            Op::SetBold(true) => "BoldOn",
            Op::SetBold(false) => "BoldOff",
            Op::SetUnderline(_) => "SetUnderline",
            Op::SetFontSize(_) => "SetFontSize",
            Op::SetAlign(_) => "SetAlign",
            Op::Print { .. } => "Print",
            Op::NextLine(_) => "NextLine",
            Op::PrintQr { .. } => "PrintQr",
            Op::PrintQr2 { .. } => "PrintQr2",
            Op::PrintBarcode { .. } => "PrintBarcode",
            Op::PrintBitmap(_) => "PrintBitmap",
        }
    }
}

/// An ordered list of ops.
///
/// Sessions keep one as a journal of what was actually sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// The last `n` ops (fewer if the program is shorter).
    pub fn tail(&self, n: usize) -> &[Op] {
        &self.ops[self.ops.len().saturating_sub(n)..]
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
