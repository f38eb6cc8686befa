//! # Instruction Dispatch
//!
//! Maps named instructions to printer commands and runs them as a batch.
//!
//! ## Modules
//!
//! - [`method`]: The closed table of instruction names
//! - [`params`]: Typed positional access to loosely typed parameters
//! - [`parse`]: Instruction to [`Command`](crate::printer::Command)
//! - [`instruction`]: The JSON request format
//! - [`batch`]: Batch runner with per-instruction fault isolation

pub mod batch;
pub mod instruction;
pub mod method;
pub mod params;
pub mod parse;

pub use batch::{
    BatchFailure, BatchReport, Dispatcher, InstructionOutcome, SUCCESS_MESSAGE, dispatch,
};
pub use instruction::{Instruction, Payload};
pub use method::Method;
pub use parse::parse_command;
