//! # Printer Transport Layer
//!
//! This module provides communication backends for sending data to printers.
//!
//! ## Available Transports
//!
//! - [`bluetooth`]: Bluetooth RFCOMM for wireless printing (Linux)
//! - [`memory`]: In-memory recorder for dry runs and tests

pub mod bluetooth;
pub mod memory;

pub use bluetooth::BluetoothTransport;
pub use memory::MemoryTransport;

use crate::error::PrinterError;

/// A byte channel to a printer.
///
/// Calls block until the channel accepts the bytes or fails. A session calls
/// [`connect`](Transport::connect) exactly once before any
/// [`send`](Transport::send).
pub trait Transport {
    /// Establish the link. The error describes why the printer is unreachable.
    fn connect(&mut self) -> Result<(), PrinterError>;

    /// Write one encoded command to the printer.
    fn send(&mut self, data: &[u8]) -> Result<(), PrinterError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<(), PrinterError> {
        (**self).connect()
    }

    fn send(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        (**self).send(data)
    }
}
