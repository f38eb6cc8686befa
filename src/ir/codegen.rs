//! # Code Generation
//!
//! The [`Encoder`] seam between logical ops and device bytes, and the
//! default ESC/POS implementation of it.

use super::ops::Op;
use crate::error::PrinterError;
use crate::printer::PrinterConfig;
use crate::protocol::{barcode, codec, commands, graphics, text};
use crate::render::{Bitmap, bitmap};

/// Command encoder: turns ops into device bytes and raw images into bitmaps.
///
/// The printer session only talks to this trait, so the byte layout of a
/// particular device family stays out of the dispatch layer.
pub trait Encoder {
    /// Compile one op to the exact bytes the device expects.
    fn encode(&self, op: &Op) -> Vec<u8>;

    /// Decode encoded image bytes into a printable bitmap.
    fn decode_image(&self, raw: &[u8]) -> Result<Bitmap, PrinterError>;
}

/// ESC/POS encoder for 58 mm receipt printers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscPosEncoder {
    config: PrinterConfig,
}

impl EscPosEncoder {
    /// Create an encoder for a specific printer.
    pub fn new(config: PrinterConfig) -> Self {
        Self { config }
    }

    /// The printer this encoder targets.
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }
}

impl Encoder for EscPosEncoder {
    fn encode(&self, op: &Op) -> Vec<u8> {
        match op {
            // ===== Printer Control =====
            Op::Init => commands::init(),
            Op::SetCodeSystem(charset) => commands::set_code_system(charset.param()),
            Op::LineSpacing(value) => commands::line_spacing(*value),
            Op::SetDarkness(level) => commands::darkness(*level),

            // ===== Style Changes =====
            Op::SetBold(true) => text::bold_on(),
            Op::SetBold(false) => text::bold_off(),
            Op::SetUnderline(mode) => text::underline(*mode),
            Op::SetFontSize(n) => text::font_size(*n),
            Op::SetAlign(alignment) => text::align(*alignment),

            // ===== Content =====
            Op::Print { text, charset } => codec::encode(*charset, text),
            Op::NextLine(count) => commands::next_line(*count),

            // ===== Barcodes =====
            Op::PrintQr {
                data,
                module_size,
                error_level,
            } => barcode::qr::generate(data.as_bytes(), *module_size, *error_level),
            Op::PrintQr2 {
                first,
                second,
                module_size,
                error_level,
            } => barcode::qr::generate_double(
                first.as_bytes(),
                second.as_bytes(),
                *module_size,
                *error_level,
            ),
            Op::PrintBarcode {
                data,
                symbology,
                height,
                width,
                text_position,
            } => barcode::barcode1d::barcode(
                data.as_bytes(),
                *symbology,
                *height,
                *width,
                *text_position,
            ),

            // ===== Graphics =====
            Op::PrintBitmap(image) => graphics::bitmap(image),
        }
    }

    fn decode_image(&self, raw: &[u8]) -> Result<Bitmap, PrinterError> {
        bitmap::decode(raw, self.config.width_dots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::CharacterSet;
    use crate::protocol::text::{Alignment, UnderlineMode};

    fn encode(op: Op) -> Vec<u8> {
        EscPosEncoder::default().encode(&op)
    }

    #[test]
    fn test_init() {
        assert_eq!(encode(Op::Init), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_code_system() {
        assert_eq!(
            encode(Op::SetCodeSystem(CharacterSet::Utf8)),
            vec![0x1C, 0x43, 0xFF]
        );
        assert_eq!(
            encode(Op::SetCodeSystem(CharacterSet::Big5)),
            vec![0x1C, 0x43, 0x01]
        );
    }

    #[test]
    fn test_styles() {
        assert_eq!(encode(Op::SetBold(true)), vec![0x1B, 0x45, 0x01]);
        assert_eq!(encode(Op::SetBold(false)), vec![0x1B, 0x45, 0x00]);
        assert_eq!(
            encode(Op::SetUnderline(UnderlineMode::TwoDot)),
            vec![0x1B, 0x2D, 0x02]
        );
        assert_eq!(encode(Op::SetFontSize(0x11)), vec![0x1D, 0x21, 0x11]);
        assert_eq!(
            encode(Op::SetAlign(Alignment::Right)),
            vec![0x1B, 0x61, 0x02]
        );
    }

    #[test]
    fn test_print_uses_charset() {
        let utf8 = encode(Op::Print {
            text: "你".into(),
            charset: CharacterSet::Utf8,
        });
        let gb = encode(Op::Print {
            text: "你".into(),
            charset: CharacterSet::Gb18030,
        });
        assert_eq!(utf8, "你".as_bytes());
        assert_eq!(gb, vec![0xC4, 0xE3]);
    }

    #[test]
    fn test_next_line_and_spacing() {
        assert_eq!(encode(Op::NextLine(3)), vec![0x0A; 3]);
        assert_eq!(encode(Op::LineSpacing(30)), vec![0x1B, 0x33, 30]);
    }

    #[test]
    fn test_qr() {
        let bytes = encode(Op::PrintQr {
            data: "https://example.com".into(),
            module_size: 4,
            error_level: 1,
        });
        assert_eq!(bytes, barcode::qr::generate(b"https://example.com", 4, 1));
    }

    #[test]
    fn test_bitmap() {
        let image = Bitmap::new(8, 1, vec![0xFF]).unwrap();
        assert_eq!(
            encode(Op::PrintBitmap(image)),
            vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0xFF]
        );
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        let encoder = EscPosEncoder::default();
        assert!(encoder.decode_image(&[0, 1, 2, 3]).is_err());
    }
}
