//! # Memory Transport
//!
//! Records every write instead of talking to hardware. Connection refusal and
//! write failures can be scripted, which is how batch abort paths are tested.

use super::Transport;
use crate::error::PrinterError;

/// In-memory transport.
///
/// ```
/// use thermal_dispatch::transport::{MemoryTransport, Transport};
///
/// let mut transport = MemoryTransport::new();
/// transport.connect()?;
/// transport.send(&[0x1B, 0x40])?;
/// assert_eq!(transport.bytes(), vec![0x1B, 0x40]);
/// # Ok::<(), thermal_dispatch::error::PrinterError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Vec<Vec<u8>>,
    connected: bool,
    refuse: bool,
    fail_after: Option<usize>,
    fail_on: Option<usize>,
    attempts: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `connect` fail.
    pub fn refuse_connection(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Accept `count` writes, then fail every write after that.
    pub fn fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Reject only write number `index` (0-based, counting every attempt).
    pub fn fail_on(mut self, index: usize) -> Self {
        self.fail_on = Some(index);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Each accepted write, in order.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// All accepted writes concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.sent.concat()
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self) -> Result<(), PrinterError> {
        if self.refuse {
            return Err(PrinterError::Connection("connection refused".into()));
        }
        self.connected = true;
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        if !self.connected {
            return Err(PrinterError::Transport("write before connect".into()));
        }
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on == Some(attempt)
            || self.fail_after.is_some_and(|limit| self.sent.len() >= limit)
        {
            return Err(PrinterError::Transport(format!(
                "write {} rejected",
                attempt + 1
            )));
        }
        self.sent.push(data.to_vec());
        Ok(())
    }
}
