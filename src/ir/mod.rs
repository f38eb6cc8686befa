//! # Intermediate Representation (IR)
//!
//! The IR sits between the printer session and raw ESC/POS bytes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌───────────┐     ┌───────────┐
//! │ PrinterState │ ──► │     Op      │ ──► │  Encoder  │ ──► │ Transport │
//! │ (transition) │     │ (logical)   │     │  (bytes)  │     │           │
//! └──────────────┘     └─────────────┘     └───────────┘     └───────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use thermal_dispatch::ir::{Encoder, EscPosEncoder, Op};
//! use thermal_dispatch::protocol::text::Alignment;
//!
//! let encoder = EscPosEncoder::default();
//! let bytes: Vec<u8> = [Op::Init, Op::SetAlign(Alignment::Center), Op::SetBold(true)]
//!     .iter()
//!     .flat_map(|op| encoder.encode(op))
//!     .collect();
//! assert_eq!(bytes, vec![0x1B, 0x40, 0x1B, 0x61, 0x01, 0x1B, 0x45, 0x01]);
//! ```

mod codegen;
mod ops;

pub use codegen::{Encoder, EscPosEncoder};
pub use ops::*;
