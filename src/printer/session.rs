//! # Printer Session
//!
//! Binds a [`PrinterState`] to a transport and an encoder for the lifetime of
//! one batch. The session is the only place ops turn into bytes on the wire.

use tracing::{debug, info, instrument};

use super::command::*;
use super::config::TrailingFeed;
use super::state::PrinterState;
use crate::error::PrinterError;
use crate::ir::{Encoder, Op, Program};
use crate::protocol::codec::CharacterSet;
use crate::transport::Transport;

/// One connected print session.
///
/// ```
/// use thermal_dispatch::ir::EscPosEncoder;
/// use thermal_dispatch::printer::PrinterSession;
/// use thermal_dispatch::protocol::codec::CharacterSet;
/// use thermal_dispatch::transport::MemoryTransport;
///
/// let mut transport = MemoryTransport::new();
/// let encoder = EscPosEncoder::default();
/// let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8)?;
/// session.set_alignment("center")?;
/// session.print_line("THANK YOU")?;
/// assert_eq!(session.journal().len(), 5);
/// # Ok::<(), thermal_dispatch::error::PrinterError>(())
/// ```
pub struct PrinterSession<'a, T: Transport + ?Sized, E: Encoder + ?Sized> {
    transport: &'a mut T,
    encoder: &'a E,
    state: PrinterState,
    journal: Program,
}

impl<'a, T: Transport + ?Sized, E: Encoder + ?Sized> PrinterSession<'a, T, E> {
    /// A disconnected session. Every emitting call fails until
    /// [`connect`](Self::connect) succeeds.
    pub fn new(transport: &'a mut T, encoder: &'a E) -> Self {
        Self {
            transport,
            encoder,
            state: PrinterState::new(),
            journal: Program::new(),
        }
    }

    /// Create a session and connect it.
    pub fn open(
        transport: &'a mut T,
        encoder: &'a E,
        character_set: CharacterSet,
    ) -> Result<Self, PrinterError> {
        let mut session = Self::new(transport, encoder);
        session.connect(character_set)?;
        Ok(session)
    }

    /// Connect the transport, reset the printer and select `character_set`.
    ///
    /// Any failure here, including a rejected reset, is reported as
    /// [`PrinterError::Connection`].
    #[instrument(level = "debug", skip(self))]
    pub fn connect(&mut self, character_set: CharacterSet) -> Result<(), PrinterError> {
        if self.state.is_connected() {
            return Ok(());
        }

        self.transport.connect().map_err(as_connection_error)?;

        let (next, ops) = self.state.connect(character_set);
        self.state = next;
        info!(charset = %character_set, "session connected");
        self.emit_all(ops).map_err(as_connection_error)
    }

    /// Run one command: transition, commit, then send each resulting op.
    pub fn execute(&mut self, command: Command) -> Result<(), PrinterError> {
        let (next, ops) = self.state.apply(command)?;
        self.state = next;
        self.emit_all(ops)
    }

    fn emit_all(&mut self, ops: Vec<Op>) -> Result<(), PrinterError> {
        ops.into_iter().try_for_each(|op| self.emit(op))
    }

    fn emit(&mut self, op: Op) -> Result<(), PrinterError> {
        let bytes = self.encoder.encode(&op);
        self.transport.send(&bytes)?;
        debug!(op = op.name(), bytes = bytes.len(), "sent");
        self.journal.push(op);
        Ok(())
    }

    // ===== Named operations =====

    pub fn set_character_set(&mut self, character_set: CharacterSet) -> Result<(), PrinterError> {
        self.execute(Command::SetCharacterSet(character_set))
    }

    /// Print `text` without a line feed. Empty text sends nothing.
    pub fn print_text(&mut self, text: &str) -> Result<(), PrinterError> {
        self.execute(Command::Print(TextArgs::new(text)))
    }

    /// Print `text` (if any) and feed one line.
    pub fn print_line(&mut self, text: &str) -> Result<(), PrinterError> {
        self.execute(Command::Println(TextArgs::new(text)))
    }

    pub fn next_line(&mut self, count: u16) -> Result<(), PrinterError> {
        self.execute(Command::NewLine(NewLineArgs { count: Some(count) }))
    }

    /// Set bold, or toggle it when `value` is `None`.
    pub fn set_bold(&mut self, value: Option<bool>) -> Result<(), PrinterError> {
        self.execute(Command::Bold(BoldArgs { value }))
    }

    /// `THIN`, `THICK` or `NONE`, case-insensitive.
    pub fn set_underline(&mut self, mode: &str) -> Result<(), PrinterError> {
        self.execute(Command::Underline(UnderlineArgs { mode: mode.parse()? }))
    }

    pub fn set_font_size(&mut self, width: i64, height: i64) -> Result<(), PrinterError> {
        self.execute(Command::FontSize(FontSizeArgs { width, height }))
    }

    pub fn set_darkness(&mut self, level: i32) -> Result<(), PrinterError> {
        self.execute(Command::Darkness(DarknessArgs { level }))
    }

    /// `LEFT`, `CENTER` or `RIGHT`, case-insensitive.
    pub fn set_alignment(&mut self, value: &str) -> Result<(), PrinterError> {
        self.execute(Command::Align(AlignArgs {
            alignment: value.parse()?,
        }))
    }

    pub fn print_qr(
        &mut self,
        data: &str,
        module_size: i32,
        error_level: i32,
    ) -> Result<(), PrinterError> {
        self.execute(Command::Qr(QrArgs {
            data: data.to_string(),
            module_size,
            error_level,
        }))
    }

    pub fn print_qr2(
        &mut self,
        first: &str,
        second: &str,
        module_size: i32,
        error_level: i32,
    ) -> Result<(), PrinterError> {
        self.execute(Command::Qr2(Qr2Args {
            first: first.to_string(),
            second: second.to_string(),
            module_size,
            error_level,
        }))
    }

    pub fn print_barcode(
        &mut self,
        data: &str,
        symbology: i32,
        height: i32,
        width: i32,
        text_position: i32,
    ) -> Result<(), PrinterError> {
        self.execute(Command::Barcode(BarcodeArgs {
            data: data.to_string(),
            symbology,
            height,
            width,
            text_position,
        }))
    }

    pub fn set_line_spacing(&mut self, value: i32) -> Result<(), PrinterError> {
        self.execute(Command::LineSpacing(LineSpacingArgs { value: Some(value) }))
    }

    /// Decode an encoded image through the encoder and print it.
    pub fn print_bitmap(&mut self, raw: &[u8]) -> Result<(), PrinterError> {
        if !self.state.is_connected() {
            return Err(PrinterError::NotConnected);
        }
        let bitmap = self.encoder.decode_image(raw)?;
        self.execute(Command::Bitmap(BitmapArgs { bitmap }))
    }

    /// Restore line spacing and feed blank lines. Does nothing on a session
    /// that never connected.
    pub fn finish(&mut self, trailing: &TrailingFeed) -> Result<(), PrinterError> {
        if !self.state.is_connected() {
            return Ok(());
        }
        self.set_line_spacing(trailing.line_spacing)?;
        self.next_line(trailing.lines)
    }

    // ===== Accessors =====

    pub fn state(&self) -> &PrinterState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn encoder(&self) -> &E {
        self.encoder
    }

    /// Ops sent so far, in order.
    pub fn journal(&self) -> &Program {
        &self.journal
    }

    pub fn into_journal(self) -> Program {
        self.journal
    }
}

fn as_connection_error(error: PrinterError) -> PrinterError {
    match error {
        PrinterError::Connection(_) => error,
        other => PrinterError::Connection(other.to_string()),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EscPosEncoder;
    use crate::protocol::text::{Alignment, UnderlineMode};
    use crate::transport::MemoryTransport;
    use pretty_assertions::assert_eq;

    fn init_ops() -> Vec<Op> {
        vec![Op::Init, Op::SetCodeSystem(CharacterSet::Utf8)]
    }

    #[test]
    fn test_open_sends_init_and_code_system() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();
        assert!(session.is_connected());
        assert_eq!(session.journal().ops, init_ops());
        drop(session);
        assert_eq!(transport.bytes(), vec![0x1B, 0x40, 0x1C, 0x43, 0xFF]);
    }

    #[test]
    fn test_connect_failure() {
        let mut transport = MemoryTransport::new().refuse_connection();
        let encoder = EscPosEncoder::default();
        let result = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8);
        assert!(matches!(result, Err(PrinterError::Connection(_))));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_init_send_failure_is_connection_error() {
        let mut transport = MemoryTransport::new().fail_after(0);
        let encoder = EscPosEncoder::default();
        let result = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8);
        assert!(matches!(result, Err(PrinterError::Connection(_))));
    }

    #[test]
    fn test_emitting_while_disconnected() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::new(&mut transport, &encoder);
        assert!(matches!(
            session.print_text("hi"),
            Err(PrinterError::NotConnected)
        ));
        assert!(matches!(
            session.print_bitmap(&[1, 2, 3]),
            Err(PrinterError::NotConnected)
        ));
        assert!(session.journal().is_empty());
    }

    #[test]
    fn test_named_operations() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();

        session.set_alignment("Center").unwrap();
        session.set_underline("thick").unwrap();
        session.set_bold(None).unwrap();
        session.print_line("Hello").unwrap();

        assert!(session.state().bold());
        assert_eq!(
            session.journal().tail(5),
            &[
                Op::SetAlign(Alignment::Center),
                Op::SetUnderline(UnderlineMode::TwoDot),
                Op::SetBold(true),
                Op::Print {
                    text: "Hello".into(),
                    charset: CharacterSet::Utf8
                },
                Op::NextLine(1),
            ]
        );
    }

    #[test]
    fn test_underline_tokens() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();

        session.set_underline("thin").unwrap();
        session.set_underline("THIN").unwrap();
        assert!(matches!(
            session.set_underline(" Thin"),
            Err(PrinterError::InvalidArgument(_))
        ));
        assert!(matches!(
            session.set_underline("bold"),
            Err(PrinterError::InvalidArgument(_))
        ));
        assert_eq!(session.journal().len(), 4);
    }

    #[test]
    fn test_invalid_alignment_sends_nothing() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();
        assert!(session.set_alignment("middle").is_err());
        assert_eq!(session.journal().ops, init_ops());
    }

    #[test]
    fn test_send_failure_propagates() {
        let mut transport = MemoryTransport::new().fail_after(2);
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();
        assert!(matches!(
            session.next_line(1),
            Err(PrinterError::Transport(_))
        ));
        assert_eq!(session.journal().len(), 2);
    }

    #[test]
    fn test_finish_trailing_feed() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();
        session.finish(&TrailingFeed::default()).unwrap();
        assert_eq!(
            session.journal().tail(2),
            &[Op::LineSpacing(30), Op::NextLine(3)]
        );
    }

    #[test]
    fn test_finish_on_disconnected_session_is_noop() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::new(&mut transport, &encoder);
        session.finish(&TrailingFeed::default()).unwrap();
        assert!(session.journal().is_empty());
    }

    #[test]
    fn test_print_bitmap_rejects_garbage() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();
        assert!(matches!(
            session.print_bitmap(b"not an image"),
            Err(PrinterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_print_uses_selected_charset() {
        let mut transport = MemoryTransport::new();
        let encoder = EscPosEncoder::default();
        let mut session = PrinterSession::open(&mut transport, &encoder, CharacterSet::Utf8).unwrap();
        session.set_character_set(CharacterSet::Gb18030).unwrap();
        session.print_text("你").unwrap();
        drop(session);
        assert_eq!(transport.sent().last().unwrap(), &vec![0xC4, 0xE3]);
    }
}
