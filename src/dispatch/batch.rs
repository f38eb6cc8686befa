//! # Batch Runner
//!
//! Runs a list of instructions against one fresh session with per-instruction
//! fault isolation.
//!
//! ```text
//! connect ──► instruction 0 ──► instruction 1 ──► ... ──► trailing feed
//!    │              │ Recoverable: record, continue
//!    │              │ Fatal: stop ──────────────────────────►┘
//!    └─ failure: abort, nothing attempted
//! ```

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use super::instruction::Instruction;
use super::parse::parse_command;
use crate::error::{PrinterError, Severity};
use crate::ir::{Encoder, Program};
use crate::printer::{BatchConfig, PrinterSession};
use crate::transport::Transport;

/// Message returned to the caller when a batch completes.
pub const SUCCESS_MESSAGE: &str = "PRINT SUCCESS";

/// Parse and execute one named instruction on a connected session.
///
/// Nothing is sent unless every parameter is valid.
pub fn dispatch<T: Transport + ?Sized, E: Encoder + ?Sized>(
    session: &mut PrinterSession<'_, T, E>,
    name: &str,
    params: Option<&[Value]>,
) -> Result<(), PrinterError> {
    let command = parse_command(name, params, session.encoder())?;
    session.execute(command)
}

/// What happened to one instruction that ran to completion or was rejected.
#[derive(Debug)]
pub struct InstructionOutcome {
    /// Position in the batch.
    pub index: usize,
    pub method: String,
    /// `None` when the instruction printed.
    pub error: Option<PrinterError>,
}

impl InstructionOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a batch: per-instruction outcomes and the ops actually sent.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<InstructionOutcome>,
    pub program: Program,
}

impl BatchReport {
    /// True when no instruction was rejected.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(InstructionOutcome::is_ok)
    }

    /// Rejected instructions, in batch order.
    pub fn failures(&self) -> impl Iterator<Item = &InstructionOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }

    /// The caller-facing result. Rejected instructions do not change it.
    pub fn message(&self) -> &'static str {
        SUCCESS_MESSAGE
    }
}

/// A batch that stopped on a fatal error.
#[derive(Debug, Error)]
#[error("Printer Error: {error}")]
pub struct BatchFailure {
    #[source]
    pub error: PrinterError,
    /// Index of the instruction that was running, if any. `None` when the
    /// connection or the trailing feed failed.
    pub instruction: Option<usize>,
    /// Everything recorded up to the failure.
    pub report: BatchReport,
}

/// Runs batches with a fixed encoder and configuration.
///
/// ```
/// use serde_json::json;
/// use thermal_dispatch::dispatch::{Dispatcher, Instruction};
/// use thermal_dispatch::ir::EscPosEncoder;
/// use thermal_dispatch::transport::MemoryTransport;
///
/// let dispatcher = Dispatcher::new(EscPosEncoder::default());
/// let mut transport = MemoryTransport::new();
/// let report = dispatcher
///     .run_batch(&mut transport, &[Instruction::new("println", vec![json!("Hello")])])
///     .unwrap();
/// assert_eq!(report.message(), "PRINT SUCCESS");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<E: Encoder> {
    encoder: E,
    config: BatchConfig,
}

impl<E: Encoder> Dispatcher<E> {
    pub fn new(encoder: E) -> Self {
        Self::with_config(encoder, BatchConfig::default())
    }

    pub fn with_config(encoder: E, config: BatchConfig) -> Self {
        Self { encoder, config }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run `instructions` in order on a new session over `transport`.
    ///
    /// Rejected instructions (unknown method, bad arguments) are recorded in
    /// the report and skipped. A connection failure aborts before any
    /// instruction; any other error stops the remaining instructions. The
    /// trailing feed is sent whenever the session connected.
    #[instrument(skip_all, fields(instructions = instructions.len()))]
    pub fn run_batch<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        instructions: &[Instruction],
    ) -> Result<BatchReport, BatchFailure> {
        let mut session = PrinterSession::new(transport, &self.encoder);
        if let Err(error) = session.connect(self.config.character_set) {
            error!(%error, "batch aborted before first instruction");
            return Err(BatchFailure {
                error,
                instruction: None,
                report: BatchReport {
                    outcomes: Vec::new(),
                    program: session.into_journal(),
                },
            });
        }

        let mut outcomes = Vec::with_capacity(instructions.len());
        let mut fatal = None;

        for (index, instruction) in instructions.iter().enumerate() {
            let method = instruction.method.as_str();
            let result = match instruction.malformed() {
                Some(reason) => Err(PrinterError::invalid(format!(
                    "malformed instruction: {reason}"
                ))),
                None => dispatch(&mut session, method, instruction.params()),
            };
            match result {
                Ok(()) => {
                    debug!(index, method, "instruction done");
                    outcomes.push(InstructionOutcome {
                        index,
                        method: method.to_string(),
                        error: None,
                    });
                }
                Err(error) if error.severity() == Severity::Recoverable => {
                    warn!(index, method, %error, "instruction rejected");
                    outcomes.push(InstructionOutcome {
                        index,
                        method: method.to_string(),
                        error: Some(error),
                    });
                }
                Err(error) => {
                    error!(index, method, %error, "batch aborted");
                    fatal = Some((index, error));
                    break;
                }
            }
        }

        let trailing = session.finish(&self.config.trailing);
        let report = BatchReport {
            outcomes,
            program: session.into_journal(),
        };

        match (fatal, trailing) {
            (None, Ok(())) => {
                info!(
                    sent = report.program.len(),
                    rejected = report.failures().count(),
                    "batch printed"
                );
                Ok(report)
            }
            (None, Err(error)) => {
                error!(%error, "trailing feed failed");
                Err(BatchFailure {
                    error,
                    instruction: None,
                    report,
                })
            }
            (Some((index, error)), trailing) => {
                if let Err(trailing_error) = trailing {
                    warn!(error = %trailing_error, "trailing feed failed after abort");
                }
                Err(BatchFailure {
                    error,
                    instruction: Some(index),
                    report,
                })
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
