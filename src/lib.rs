//! # thermal-dispatch - Instruction Dispatch for Thermal Receipt Printers
//!
//! thermal-dispatch turns a batch of named print instructions into a
//! validated, stateful ESC/POS command stream for 58 mm receipt printers
//! (Sunmi built-in printers and compatibles) over Bluetooth. It provides:
//!
//! - **Dispatch**: a closed table of named methods with typed argument parsing
//! - **Printer state**: character set and bold tracking with pure transitions
//! - **Fault isolation**: bad instructions are skipped, link failures abort
//! - **Protocol implementation**: ESC/POS command builders and a text codec
//! - **Transport**: Bluetooth RFCOMM communication
//!
//! ## Quick Start
//!
//! ```no_run
//! use thermal_dispatch::{
//!     dispatch::{Dispatcher, Payload},
//!     ir::EscPosEncoder,
//!     transport::BluetoothTransport,
//! };
//!
//! let instructions = Payload::parse(
//!     r#"{"payload": [
//!         {"method": "align", "params": ["center"]},
//!         {"method": "bold", "params": [true]},
//!         {"method": "println", "params": ["RECEIPT"]},
//!         {"method": "qr", "params": ["https://example.com", 4, 1]}
//!     ]}"#,
//! )?;
//!
//! let dispatcher = Dispatcher::new(EscPosEncoder::default());
//! let mut transport = BluetoothTransport::new("/dev/rfcomm0");
//! let report = dispatcher.run_batch(&mut transport, &instructions)?;
//! println!("{}", report.message());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dispatch`] | Instruction table, parsing and the batch runner |
//! | [`printer`] | Printer state, sessions and configuration |
//! | [`ir`] | Logical ops and the encoder seam |
//! | [`protocol`] | ESC/POS command builders |
//! | [`render`] | Image decoding and dithering |
//! | [`transport`] | Communication backends |
//! | [`error`] | Error types |

pub mod dispatch;
pub mod error;
pub mod ir;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use dispatch::{BatchFailure, BatchReport, Dispatcher, Instruction};
pub use error::PrinterError;
pub use ir::EscPosEncoder;
pub use printer::PrinterConfig;
pub use transport::BluetoothTransport;
