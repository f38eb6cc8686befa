//! # Printer Module
//!
//! Everything that knows about one printer session.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications and batch settings
//! - [`command`]: Typed requests, one argument struct per operation
//! - [`state`]: Printer state and its pure transition function
//! - [`session`]: State bound to a transport and an encoder

pub mod command;
pub mod config;
pub mod session;
pub mod state;

pub use command::Command;
pub use config::{BatchConfig, PrinterConfig, TrailingFeed};
pub use session::PrinterSession;
pub use state::{PrinterState, bounded, font_size_byte};
