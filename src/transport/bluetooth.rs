//! # Bluetooth RFCOMM Transport
//!
//! Talks to the printer over the Bluetooth Serial Port Profile (SPP), through
//! an RFCOMM tty bound by the host.
//!
//! ## Bluetooth Setup (Linux)
//!
//! Before using this transport, the printer must be paired and bound to an
//! RFCOMM device:
//!
//! ```bash
//! # 1. Find the printer's Bluetooth address
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Look for "InnerPrinter" or the POS terminal's name
//! # Note the address, e.g., 00:11:22:XX:XX:XX
//!
//! # 2. Pair with the printer
//! [bluetooth]# pair 00:11:22:XX:XX:XX
//!
//! # 3. Bind to RFCOMM device
//! $ sudo rfcomm bind 0 00:11:22:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! Or let [`setup_rfcomm`] do steps 2 and 3 for a known MAC address.
//!
//! ## TTY Configuration
//!
//! The device is opened on [`Transport::connect`] and switched to raw mode so
//! binary data is transmitted without modification:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, etc. cleared
//! - **No output processing**: OPOST cleared (no CR/LF translation)
//! - **8-bit characters**: CS8, no parity
//! - **No echo, non-canonical**: ECHO, ECHONL, ICANON cleared
//!
//! ## Chunked Writes
//!
//! Writes larger than 4096 bytes are split, with a 2 ms pause between chunks
//! so the Bluetooth buffer is not overrun by big raster images.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::Transport;
use crate::error::PrinterError;

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
pub const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
pub const CHUNK_DELAY_MS: u64 = 2;

/// # Bluetooth Printer Transport
///
/// ```no_run
/// use thermal_dispatch::transport::{BluetoothTransport, Transport};
///
/// let mut transport = BluetoothTransport::new("/dev/rfcomm0");
/// transport.connect()?;
/// transport.send(&[0x1B, 0x40])?;
/// # Ok::<(), thermal_dispatch::error::PrinterError>(())
/// ```
#[derive(Debug)]
pub struct BluetoothTransport {
    device: PathBuf,
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl BluetoothTransport {
    /// Create a transport for `device`. Nothing is opened until `connect`.
    pub fn new<P: AsRef<Path>>(device: P) -> Self {
        Self {
            device: device.as_ref().to_path_buf(),
            file: None,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    /// Transport for the default device path (/dev/rfcomm0)
    pub fn default_device() -> Self {
        Self::new(DEFAULT_DEVICE)
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    /// Set the chunk size for large writes.
    ///
    /// Larger chunks are faster but may overflow the Bluetooth buffer.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_delay(&self) -> Duration {
        self.chunk_delay
    }

    fn write_chunked(file: &mut File, data: &[u8], chunk_size: usize, delay: Duration) -> io::Result<()> {
        if data.len() <= chunk_size {
            return file.write_all(data);
        }

        for chunk in data.chunks(chunk_size) {
            file.write_all(chunk)?;
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        Ok(())
    }
}

impl Transport for BluetoothTransport {
    /// Open the device and configure it for raw binary output.
    ///
    /// Fails with [`PrinterError::Connection`] if the device does not exist,
    /// permission is denied (root or the dialout group may be needed), or the
    /// TTY cannot be configured.
    fn connect(&mut self) -> Result<(), PrinterError> {
        if self.file.is_some() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .write(true)
            .open(&self.device)
            .map_err(|e| {
                PrinterError::Connection(format!("Failed to open {}: {}", self.device.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd())
            .map_err(|e| PrinterError::Connection(format!("{}: {}", self.device.display(), e)))?;

        info!(device = %self.device.display(), "printer connected");
        self.file = Some(file);
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        let file = self.file.as_mut().ok_or(PrinterError::NotConnected)?;
        if data.is_empty() {
            return Ok(());
        }

        Self::write_chunked(file, data, self.chunk_size, self.chunk_delay)
            .map_err(|e| PrinterError::Transport(format!("Write failed: {}", e)))?;
        file.flush()
            .map_err(|e| PrinterError::Transport(format!("Flush failed: {}", e)))?;

        debug!(bytes = data.len(), "wrote to printer");
        Ok(())
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY are cleared too: 0x11 (XON) and 0x13 (XOFF) occur in
/// raster data and must not be swallowed as flow control.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> io::Result<()> {
    Ok(())
}

// ============================================================================
// RFCOMM SETUP HELPERS
// ============================================================================

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Device path named by an `rfcommN: XX:XX:...` listing line, if that line
/// mentions `mac` and the device node exists.
fn device_in_listing(listing: &str, mac_upper: &str) -> Option<String> {
    listing
        .lines()
        .filter(|line| line.to_uppercase().contains(mac_upper))
        .filter_map(|line| line.split(':').next())
        .map(|name| format!("/dev/{}", name.trim()))
        .find(|path| Path::new(path).exists())
}

/// Find an existing RFCOMM device bound to the given MAC address.
///
/// Checks `/proc/net/rfcomm` and falls back to `rfcomm -a`.
#[cfg(unix)]
pub fn find_rfcomm_for_mac(mac: &str) -> Result<Option<String>, PrinterError> {
    let mac_upper = mac.to_uppercase();

    if let Ok(contents) = std::fs::read_to_string("/proc/net/rfcomm") {
        if let Some(device) = device_in_listing(&contents, &mac_upper) {
            return Ok(Some(device));
        }
    }

    let output = Command::new("rfcomm")
        .arg("-a")
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run 'rfcomm -a': {}", e)))?;

    Ok(device_in_listing(
        &String::from_utf8_lossy(&output.stdout),
        &mac_upper,
    ))
}

#[cfg(not(unix))]
pub fn find_rfcomm_for_mac(_mac: &str) -> Result<Option<String>, PrinterError> {
    Ok(None)
}

/// Set up an RFCOMM device for a Bluetooth MAC address.
///
/// Runs `bluetoothctl connect`, then `l2ping -c 1`, then
/// `rfcomm bind <channel> <MAC> 1`. Returns the device path on success.
///
/// **Requires root privileges** for `rfcomm bind`.
#[cfg(unix)]
pub fn setup_rfcomm(mac: &str, channel: u8) -> Result<String, PrinterError> {
    let mac_upper = mac.to_uppercase();
    let device_path = format!("/dev/rfcomm{}", channel);

    info!(mac = %mac_upper, "connecting");
    let output = Command::new("bluetoothctl")
        .arg("connect")
        .arg(&mac_upper)
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run bluetoothctl: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.contains("Connection successful") || stdout.contains("already connected") {
        debug!("bluetoothctl connected");
    } else {
        // l2ping below decides whether the device is usable
        warn!(output = %stdout.trim(), "bluetoothctl did not confirm connection");
    }

    thread::sleep(Duration::from_millis(500));

    let output = Command::new("l2ping")
        .arg("-c")
        .arg("1")
        .arg(&mac_upper)
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run l2ping: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Connection(format!(
            "Device {} not reachable: {}",
            mac_upper,
            stderr.trim()
        )));
    }

    let output = Command::new("rfcomm")
        .arg("bind")
        .arg(channel.to_string())
        .arg(&mac_upper)
        .arg("1") // SPP channel
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run rfcomm bind: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Transport(format!(
            "rfcomm bind failed: {}",
            stderr.trim()
        )));
    }

    thread::sleep(Duration::from_millis(500));

    if !Path::new(&device_path).exists() {
        return Err(PrinterError::Transport(format!(
            "Device {} was not created",
            device_path
        )));
    }

    info!(device = %device_path, "rfcomm bound");
    Ok(device_path)
}

#[cfg(not(unix))]
pub fn setup_rfcomm(_mac: &str, _channel: u8) -> Result<String, PrinterError> {
    Err(PrinterError::Transport(
        "RFCOMM setup not supported on this platform".to_string(),
    ))
}

// ============================================================================
// TESTS
// ============================================================================
