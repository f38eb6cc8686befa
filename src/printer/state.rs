//! # Printer State
//!
//! The configuration a session carries between instructions, and the pure
//! transition function that turns a [`Command`] into the next state plus the
//! ops to emit.
//!
//! ```text
//!  ┌──────────────┐  connect()   ┌───────────┐
//!  │ Disconnected │ ───────────► │ Connected │ ◄─┐ apply(command)
//!  └──────────────┘              └───────────┘ ──┘
//! ```
//!
//! Nothing here touches a transport. The session commits the returned state
//! and then sends the ops, so every transition is testable on its own.

use super::command::Command;
use crate::error::PrinterError;
use crate::ir::Op;
use crate::protocol::codec::CharacterSet;
use crate::protocol::commands::DEFAULT_LINE_SPACING;
use crate::protocol::text;

/// Smallest and largest character magnification per axis.
const FONT_SCALE_MIN: i64 = 1;
const FONT_SCALE_MAX: i64 = 16;

/// Mutable printer configuration for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrinterState {
    character_set: CharacterSet,
    bold: bool,
    inverted: bool,
    connected: bool,
}

impl PrinterState {
    /// A fresh, disconnected state with UTF-8 text and bold off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn character_set(&self) -> CharacterSet {
        self.character_set
    }

    pub fn bold(&self) -> bool {
        self.bold
    }

    /// White-on-black printing. Held for completeness; no op emits it.
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Transition taken once the transport accepts the connection.
    ///
    /// Emits a printer reset followed by the code system selection, so the
    /// device and the state agree on the character set from the first byte.
    pub fn connect(&self, character_set: CharacterSet) -> (Self, Vec<Op>) {
        let next = Self {
            character_set,
            connected: true,
            ..*self
        };
        (next, vec![Op::Init, Op::SetCodeSystem(character_set)])
    }

    /// Apply one command.
    ///
    /// Returns the state to commit and the ops to emit, in order. Fails with
    /// [`PrinterError::NotConnected`] before a successful [`connect`](Self::connect).
    pub fn apply(&self, command: Command) -> Result<(Self, Vec<Op>), PrinterError> {
        if !self.connected {
            return Err(PrinterError::NotConnected);
        }

        let mut next = *self;
        let ops = match command {
            Command::SetCharacterSet(charset) => {
                next.character_set = charset;
                vec![Op::SetCodeSystem(charset)]
            }
            Command::Align(args) => vec![Op::SetAlign(args.alignment)],
            Command::Barcode(args) => vec![Op::PrintBarcode {
                data: args.data,
                symbology: args.symbology,
                height: args.height,
                width: args.width,
                text_position: args.text_position,
            }],
            Command::Bitmap(args) => vec![Op::PrintBitmap(args.bitmap)],
            Command::Bold(args) => {
                next.bold = args.value.unwrap_or(!self.bold);
                vec![Op::SetBold(next.bold)]
            }
            Command::Darkness(args) => vec![Op::SetDarkness(args.level)],
            Command::FontSize(args) => {
                vec![Op::SetFontSize(font_size_byte(args.width, args.height)?)]
            }
            Command::LineSpacing(args) => {
                vec![Op::LineSpacing(args.value.unwrap_or(DEFAULT_LINE_SPACING))]
            }
            Command::NewLine(args) => vec![Op::NextLine(args.count.unwrap_or(1))],
            Command::Print(args) => self.print_ops(args.text),
            Command::Println(args) => {
                let mut ops = self.print_ops(args.text);
                ops.push(Op::NextLine(1));
                ops
            }
            Command::Qr(args) => vec![Op::PrintQr {
                data: args.data,
                module_size: args.module_size,
                error_level: args.error_level,
            }],
            Command::Qr2(args) => vec![Op::PrintQr2 {
                first: args.first,
                second: args.second,
                module_size: args.module_size,
                error_level: args.error_level,
            }],
            Command::Underline(args) => vec![Op::SetUnderline(args.mode)],
        };

        Ok((next, ops))
    }

    fn print_ops(&self, text: Option<String>) -> Vec<Op> {
        match text {
            Some(text) if !text.is_empty() => vec![Op::Print {
                text,
                charset: self.character_set,
            }],
            _ => Vec::new(),
        }
    }
}

/// Clamp `value` into `low..=high`.
///
/// ## Errors
///
/// [`PrinterError::InvalidArgument`] when `low > high`.
///
/// ```
/// use thermal_dispatch::printer::bounded;
///
/// assert_eq!(bounded(5, 1, 16).unwrap(), 5);
/// assert_eq!(bounded(-3, 1, 16).unwrap(), 1);
/// assert!(bounded(0, 16, 1).is_err());
/// ```
pub fn bounded(value: i64, low: i64, high: i64) -> Result<i64, PrinterError> {
    if low > high {
        return Err(PrinterError::invalid(format!(
            "lower bound {low} is greater than upper bound {high}"
        )));
    }
    Ok(value.clamp(low, high))
}

/// Character size byte for `GS ! n`, clamping both axes to `1..=16`.
pub fn font_size_byte(width: i64, height: i64) -> Result<u8, PrinterError> {
    let width = bounded(width, FONT_SCALE_MIN, FONT_SCALE_MAX)?;
    let height = bounded(height, FONT_SCALE_MIN, FONT_SCALE_MAX)?;
    // both in 1..=16 after clamping
    Ok(text::size_byte(width as u8, height as u8))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::command::*;
    use crate::protocol::text::{Alignment, UnderlineMode};

    fn connected() -> PrinterState {
        PrinterState::new().connect(CharacterSet::Utf8).0
    }

    fn ops(state: &PrinterState, command: Command) -> Vec<Op> {
        state.apply(command).unwrap().1
    }

    // ========== Lifecycle ==========

    #[test]
    fn test_default_state() {
        let state = PrinterState::new();
        assert_eq!(state.character_set(), CharacterSet::Utf8);
        assert!(!state.bold());
        assert!(!state.inverted());
        assert!(!state.is_connected());
    }

    #[test]
    fn test_connect_emits_init_then_code_system() {
        let (state, ops) = PrinterState::new().connect(CharacterSet::Gb18030);
        assert!(state.is_connected());
        assert_eq!(state.character_set(), CharacterSet::Gb18030);
        assert_eq!(ops, vec![Op::Init, Op::SetCodeSystem(CharacterSet::Gb18030)]);
    }

    #[test]
    fn test_apply_requires_connection() {
        let result = PrinterState::new().apply(Command::NewLine(NewLineArgs::default()));
        assert!(matches!(result, Err(PrinterError::NotConnected)));
    }

    // ========== Character Set ==========

    #[test]
    fn test_set_character_set_updates_state() {
        let (state, ops) = connected()
            .apply(Command::SetCharacterSet(CharacterSet::Big5))
            .unwrap();
        assert_eq!(state.character_set(), CharacterSet::Big5);
        assert_eq!(ops, vec![Op::SetCodeSystem(CharacterSet::Big5)]);
    }

    #[test]
    fn test_print_carries_current_charset() {
        let (state, _) = connected()
            .apply(Command::SetCharacterSet(CharacterSet::Ksc5601))
            .unwrap();
        assert_eq!(
            ops(&state, Command::Print(TextArgs::new("hi"))),
            vec![Op::Print {
                text: "hi".into(),
                charset: CharacterSet::Ksc5601
            }]
        );
    }

    // ========== Text ==========

    #[test]
    fn test_print_empty_is_noop() {
        let state = connected();
        assert!(ops(&state, Command::Print(TextArgs::new(""))).is_empty());
        assert!(ops(&state, Command::Print(TextArgs::default())).is_empty());
    }

    #[test]
    fn test_println_empty_feeds_one_line() {
        let state = connected();
        assert_eq!(
            ops(&state, Command::Println(TextArgs::new(""))),
            vec![Op::NextLine(1)]
        );
        assert_eq!(
            ops(&state, Command::Println(TextArgs::default())),
            vec![Op::NextLine(1)]
        );
    }

    #[test]
    fn test_println_text() {
        assert_eq!(
            ops(&connected(), Command::Println(TextArgs::new("Total"))),
            vec![
                Op::Print {
                    text: "Total".into(),
                    charset: CharacterSet::Utf8
                },
                Op::NextLine(1)
            ]
        );
    }

    #[test]
    fn test_new_line_default_count() {
        let state = connected();
        assert_eq!(
            ops(&state, Command::NewLine(NewLineArgs::default())),
            vec![Op::NextLine(1)]
        );
        assert_eq!(
            ops(&state, Command::NewLine(NewLineArgs { count: Some(4) })),
            vec![Op::NextLine(4)]
        );
    }

    // ========== Bold ==========

    #[test]
    fn test_bold_toggles_without_value() {
        let (state, first) = connected().apply(Command::Bold(BoldArgs::default())).unwrap();
        assert!(state.bold());
        assert_eq!(first, vec![Op::SetBold(true)]);

        let (state, second) = state.apply(Command::Bold(BoldArgs::default())).unwrap();
        assert!(!state.bold());
        assert_eq!(second, vec![Op::SetBold(false)]);
    }

    #[test]
    fn test_bold_explicit_value() {
        let (state, ops) = connected()
            .apply(Command::Bold(BoldArgs { value: Some(false) }))
            .unwrap();
        assert!(!state.bold());
        assert_eq!(ops, vec![Op::SetBold(false)]);
    }

    #[test]
    fn test_apply_does_not_mutate_receiver() {
        let state = connected();
        let _ = state.apply(Command::Bold(BoldArgs { value: Some(true) }));
        assert!(!state.bold());
    }

    // ========== Passthrough ==========

    #[test]
    fn test_passthrough_commands() {
        let state = connected();
        assert_eq!(
            ops(&state, Command::Darkness(DarknessArgs { level: -7 })),
            vec![Op::SetDarkness(-7)]
        );
        assert_eq!(
            ops(
                &state,
                Command::Align(AlignArgs {
                    alignment: Alignment::Center
                })
            ),
            vec![Op::SetAlign(Alignment::Center)]
        );
        assert_eq!(
            ops(
                &state,
                Command::Underline(UnderlineArgs {
                    mode: UnderlineMode::OneDot
                })
            ),
            vec![Op::SetUnderline(UnderlineMode::OneDot)]
        );
        assert_eq!(
            ops(&state, Command::LineSpacing(LineSpacingArgs::default())),
            vec![Op::LineSpacing(30)]
        );
        assert_eq!(
            ops(
                &state,
                Command::Qr(QrArgs {
                    data: "x".into(),
                    module_size: 99,
                    error_level: -1
                })
            ),
            vec![Op::PrintQr {
                data: "x".into(),
                module_size: 99,
                error_level: -1
            }]
        );
    }

    // ========== Font Size ==========

    fn expected_size_byte(width: i64, height: i64) -> u8 {
        let w = width.clamp(1, 16);
        let h = height.clamp(1, 16);
        (((w - 1) << 4) | ((h - 1) % 16)) as u8
    }

    #[test]
    fn test_font_size_axis_endpoints() {
        assert_eq!(font_size_byte(1, 1).unwrap(), 0x00);
        assert_eq!(font_size_byte(16, 1).unwrap(), 0xF0);
        assert_eq!(font_size_byte(1, 16).unwrap(), 0x0F);
        assert_eq!(font_size_byte(16, 16).unwrap(), 0xFF);
    }

    #[test]
    fn test_font_size_matches_formula_across_range() {
        let samples = (-40..=40)
            .chain([i64::MIN, i64::MIN + 1, i64::from(i32::MIN), i64::from(i32::MAX), i64::MAX]);
        let samples: Vec<i64> = samples.collect();
        for &width in &samples {
            for &height in &samples {
                assert_eq!(
                    font_size_byte(width, height).unwrap(),
                    expected_size_byte(width, height),
                    "width={width} height={height}"
                );
            }
        }
    }

    #[test]
    fn test_font_size_command_clamps() {
        assert_eq!(
            ops(
                &connected(),
                Command::FontSize(FontSizeArgs {
                    width: 0,
                    height: 100
                })
            ),
            vec![Op::SetFontSize(0x0F)]
        );
    }

    // ========== bounded ==========

    #[test]
    fn test_bounded_identity_inside_range() {
        for value in -5..=5 {
            assert_eq!(bounded(value, -5, 5).unwrap(), value);
        }
        assert_eq!(bounded(7, 7, 7).unwrap(), 7);
    }

    #[test]
    fn test_bounded_clamps_outside_range() {
        assert_eq!(bounded(-6, -5, 5).unwrap(), -5);
        assert_eq!(bounded(6, -5, 5).unwrap(), 5);
        assert_eq!(bounded(i64::MIN, 1, 16).unwrap(), 1);
        assert_eq!(bounded(i64::MAX, 1, 16).unwrap(), 16);
    }

    #[test]
    fn test_bounded_rejects_inverted_range() {
        for value in [i64::MIN, 0, 3, i64::MAX] {
            assert!(matches!(
                bounded(value, 2, 1),
                Err(PrinterError::InvalidArgument(_))
            ));
        }
    }
}
