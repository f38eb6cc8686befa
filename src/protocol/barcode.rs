//! # ESC/POS Barcode Commands
//!
//! Command builders for QR codes (`GS ( k`) and 1D barcodes (`GS k`).
//!
//! Both are passthrough from the caller's point of view: module size, error
//! level, symbology and dimensions are handed to the device, with the same
//! fallbacks the device firmware documents for out-of-range values.

use tracing::warn;

use super::commands::{ESC, GS, LF, low_byte, u16_le};

// ============================================================================
// QR CODE COMMANDS
// ============================================================================

/// QR Code command builders
///
/// A QR print is a four step sequence: module size, error correction level,
/// store the data in the symbol buffer, print the stored symbol.
pub mod qr {
    use super::{ESC, GS, LF, low_byte, u16_le, warn};

    /// Largest payload the `pL pH` length prefix can describe.
    pub const MAX_DATA_LEN: usize = u16::MAX as usize - 3;

    /// # Set Module Size (GS ( k 03 00 31 43 n)
    pub fn set_module_size(size: i32) -> Vec<u8> {
        vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x43, low_byte(size)]
    }

    /// # Set Error Correction Level (GS ( k 03 00 31 45 n)
    ///
    /// `level` 0-3 selects L, M, Q, H; it is sent as `48 + level`.
    pub fn set_error_level(level: i32) -> Vec<u8> {
        vec![
            GS,
            b'(',
            b'k',
            0x03,
            0x00,
            0x31,
            0x45,
            low_byte(level.wrapping_add(48)),
        ]
    }

    /// # Store Data in Symbol Buffer (GS ( k pL pH 31 50 30 d1...dk)
    ///
    /// `pL pH` is `k + 3`, little-endian. Data past [`MAX_DATA_LEN`] is dropped.
    pub fn store(data: &[u8]) -> Vec<u8> {
        if data.len() > MAX_DATA_LEN {
            warn!(len = data.len(), max = MAX_DATA_LEN, "QR data truncated");
        }
        let data = &data[..data.len().min(MAX_DATA_LEN)];
        // `data.len() <= MAX_DATA_LEN` so the prefix always fits
        let [p_l, p_h] = u16_le(u16::try_from(data.len() + 3).unwrap_or(u16::MAX));

        let mut cmd = Vec::with_capacity(data.len() + 8);
        cmd.extend([GS, b'(', b'k', p_l, p_h, 0x31, 0x50, 0x30]);
        cmd.extend_from_slice(data);
        cmd
    }

    /// # Print Stored Symbol (GS ( k 03 00 31 51 30)
    pub fn print() -> Vec<u8> {
        vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x51, 0x30]
    }

    /// Complete single QR code sequence, followed by a line feed.
    ///
    /// ```
    /// use thermal_dispatch::protocol::barcode::qr;
    ///
    /// let cmd = qr::generate(b"hello", 4, 1);
    /// assert_eq!(&cmd[..8], &[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 4]);
    /// assert_eq!(cmd.last(), Some(&0x0A));
    /// ```
    pub fn generate(data: &[u8], module_size: i32, error_level: i32) -> Vec<u8> {
        let mut cmd = Vec::new();
        cmd.extend(set_module_size(module_size));
        cmd.extend(set_error_level(error_level));
        cmd.extend(store(data));
        cmd.extend(print());
        cmd.push(LF);
        cmd
    }

    /// Two QR codes on one line.
    ///
    /// The first symbol is printed, the head moves 24 dots right with
    /// `ESC \`, then the second symbol is printed. Both share module size and
    /// error level. Firmware without side-by-side support prints them stacked.
    pub fn generate_double(
        first: &[u8],
        second: &[u8],
        module_size: i32,
        error_level: i32,
    ) -> Vec<u8> {
        let mut cmd = Vec::new();
        cmd.extend(set_module_size(module_size));
        cmd.extend(set_error_level(error_level));
        cmd.extend(store(first));
        cmd.extend(print());
        cmd.extend(store(second));
        cmd.extend([ESC, b'\\', 0x18, 0x00]);
        cmd.extend(print());
        cmd.push(LF);
        cmd
    }
}

// ============================================================================
// 1D BARCODE COMMANDS
// ============================================================================

/// 1D barcode command builders
pub mod barcode1d {
    use super::{GS, LF, low_byte, warn};

    /// Longest `GS k` payload, code set prefix included.
    pub const MAX_DATA_LEN: usize = u8::MAX as usize;

    /// Height used when the requested one is outside 1-255 dots.
    pub const DEFAULT_HEIGHT: i32 = 162;

    /// Module width used when the requested one is outside 2-6.
    pub const DEFAULT_WIDTH: i32 = 2;

    /// Symbologies by their caller-facing index.
    ///
    /// | Index | Symbology | `m` |
    /// |-------|-----------|-----|
    /// | 0 | UPC-A   | 65 |
    /// | 1 | UPC-E   | 66 |
    /// | 2 | EAN-13  | 67 |
    /// | 3 | EAN-8   | 68 |
    /// | 4 | CODE39  | 69 |
    /// | 5 | ITF     | 70 |
    /// | 6 | CODABAR | 71 |
    /// | 7 | CODE93  | 72 |
    /// | 8 | CODE128 | 73 |
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Symbology {
        UpcA,
        UpcE,
        Ean13,
        Ean8,
        Code39,
        Itf,
        Codabar,
        Code93,
        Code128,
    }

    impl Symbology {
        /// Look up a symbology by caller index, `None` when out of range.
        pub fn from_index(index: i32) -> Option<Self> {
            Some(match index {
                0 => Self::UpcA,
                1 => Self::UpcE,
                2 => Self::Ean13,
                3 => Self::Ean8,
                4 => Self::Code39,
                5 => Self::Itf,
                6 => Self::Codabar,
                7 => Self::Code93,
                8 => Self::Code128,
                _ => return None,
            })
        }

        /// The `m` parameter of `GS k m n`.
        pub fn code(self) -> u8 {
            match self {
                Self::UpcA => 65,
                Self::UpcE => 66,
                Self::Ean13 => 67,
                Self::Ean8 => 68,
                Self::Code39 => 69,
                Self::Itf => 70,
                Self::Codabar => 71,
                Self::Code93 => 72,
                Self::Code128 => 73,
            }
        }
    }

    /// Payload length sent for `data`, counting the CODE128 `{B` prefix.
    pub fn payload_len(data: &[u8], symbology: i32) -> usize {
        if needs_code_set(data, symbology) {
            data.len() + 2
        } else {
            data.len()
        }
    }

    fn needs_code_set(data: &[u8], symbology: i32) -> bool {
        Symbology::from_index(symbology) == Some(Symbology::Code128) && !data.starts_with(b"{")
    }

    /// # Print Barcode
    ///
    /// ```text
    /// GS H textPos   HRI position (0 none, 1 above, 2 below, 3 both)
    /// GS w width     module width (2-6)
    /// GS h height    bar height in dots (1-255)
    /// GS k m n d1..dn
    /// ```
    ///
    /// Out-of-range parameters fall back: width → 2, text position → 0,
    /// height → 162. An unknown symbology prints nothing and just feeds a
    /// line. CODE128 data without a code set prefix gets `{B`. Data beyond
    /// [`MAX_DATA_LEN`] bytes is dropped.
    ///
    /// ```
    /// use thermal_dispatch::protocol::barcode::barcode1d;
    ///
    /// let cmd = barcode1d::barcode(b"12345678", 4, 80, 2, 2);
    /// assert_eq!(&cmd[..9], &[0x1D, 0x48, 2, 0x1D, 0x77, 2, 0x1D, 0x68, 80]);
    /// assert_eq!(&cmd[9..13], &[0x1D, 0x6B, 69, 8]);
    /// ```
    pub fn barcode(
        data: &[u8],
        symbology: i32,
        height: i32,
        width: i32,
        text_position: i32,
    ) -> Vec<u8> {
        let Some(symbology) = Symbology::from_index(symbology) else {
            return vec![LF];
        };

        let width = if (2..=6).contains(&width) { width } else { DEFAULT_WIDTH };
        let text_position = if (0..=3).contains(&text_position) {
            text_position
        } else {
            0
        };
        let height = if (1..=255).contains(&height) {
            height
        } else {
            DEFAULT_HEIGHT
        };

        let mut payload = Vec::with_capacity(data.len() + 2);
        if symbology == Symbology::Code128 && !data.starts_with(b"{") {
            payload.extend_from_slice(b"{B");
        }
        payload.extend_from_slice(data);
        if payload.len() > MAX_DATA_LEN {
            warn!(len = payload.len(), max = MAX_DATA_LEN, "barcode data truncated");
            payload.truncate(MAX_DATA_LEN);
        }

        let mut cmd = Vec::with_capacity(payload.len() + 13);
        cmd.extend([GS, b'H', low_byte(text_position)]);
        cmd.extend([GS, b'w', low_byte(width)]);
        cmd.extend([GS, b'h', low_byte(height)]);
        // truncated to 255 above
        cmd.extend([GS, b'k', symbology.code(), payload.len() as u8]);
        cmd.extend(payload);
        cmd
    }
}

// ============================================================================
// TESTS
// ============================================================================
