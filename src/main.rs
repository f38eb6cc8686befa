//! # thermal-dispatch CLI
//!
//! Command-line interface for sending instruction batches to a receipt printer.
//!
//! ## Usage
//!
//! ```bash
//! # Print a batch read from a file
//! thermal-dispatch print receipt.json
//!
//! # Read the batch from stdin, printer found by MAC address
//! cat receipt.json | thermal-dispatch print --mac 00:11:22:33:44:55
//!
//! # Show the ops and bytes without touching the printer
//! thermal-dispatch print --dry-run receipt.json
//!
//! # List the instruction table
//! thermal-dispatch methods
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thermal_dispatch::{
    PrinterError,
    dispatch::{BatchFailure, BatchReport, Dispatcher, Method, Payload},
    ir::{EscPosEncoder, Op, Program},
    printer::{BatchConfig, PrinterConfig},
    protocol::codec::CharacterSet,
    transport::{BluetoothTransport, MemoryTransport, bluetooth},
};

/// thermal-dispatch - Receipt printer batch utility
#[derive(Parser, Debug)]
#[command(name = "thermal-dispatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a JSON instruction batch
    Print {
        /// Batch file; reads stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Printer device path
        #[arg(long, default_value = bluetooth::DEFAULT_DEVICE)]
        device: PathBuf,

        /// Printer Bluetooth address; binds an RFCOMM device if none exists
        #[arg(long, conflicts_with = "device")]
        mac: Option<String>,

        /// Character set selected after reset (gb18030, big5, ksc5601, utf8)
        #[arg(long, default_value = "utf8")]
        charset: CharacterSet,

        /// Largest single write to the device, in bytes
        #[arg(long, default_value_t = bluetooth::CHUNK_SIZE)]
        chunk_size: usize,

        /// Pause between chunked writes, in milliseconds
        #[arg(long, default_value_t = bluetooth::CHUNK_DELAY_MS)]
        chunk_delay: u64,

        /// Print the op journal and a hex dump instead of printing
        #[arg(long)]
        dry_run: bool,
    },

    /// List the supported instruction methods
    Methods,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("thermal_dispatch={level}"))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), PrinterError> {
    match command {
        Commands::Methods => {
            println!("Available methods:");
            for method in Method::ALL {
                println!("  {:<12} {}", method.as_str(), method.signature());
            }
            Ok(())
        }
        Commands::Print {
            file,
            device,
            mac,
            charset,
            chunk_size,
            chunk_delay,
            dry_run,
        } => {
            let instructions = Payload::parse(&read_input(file.as_ref())?)?;
            let config = BatchConfig {
                character_set: charset,
                ..BatchConfig::default()
            };
            let dispatcher =
                Dispatcher::with_config(EscPosEncoder::new(PrinterConfig::SUNMI_58MM), config);

            if dry_run {
                let mut transport = MemoryTransport::new();
                let report = conclude(dispatcher.run_batch(&mut transport, &instructions))?;
                print_journal(&report.program);
                println!();
                print_hex(&transport.bytes());
                return Ok(());
            }

            let device = match mac {
                Some(mac) => resolve_mac(&mac)?,
                None => device,
            };
            let mut transport = BluetoothTransport::new(device);
            transport.set_chunk_size(chunk_size);
            transport.set_chunk_delay(Duration::from_millis(chunk_delay));
            conclude(dispatcher.run_batch(&mut transport, &instructions))?;
            Ok(())
        }
    }
}

/// Read the batch from a file, or stdin for `None` and `-`.
fn read_input(file: Option<&PathBuf>) -> Result<String, PrinterError> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Find or create the RFCOMM device bound to `mac`.
fn resolve_mac(mac: &str) -> Result<PathBuf, PrinterError> {
    if !bluetooth::is_valid_mac(mac) {
        return Err(PrinterError::invalid(format!(
            "'{}' is not a Bluetooth address (XX:XX:XX:XX:XX:XX)",
            mac
        )));
    }
    let device = match bluetooth::find_rfcomm_for_mac(mac)? {
        Some(device) => device,
        None => bluetooth::setup_rfcomm(mac, 0)?,
    };
    Ok(PathBuf::from(device))
}

/// Report rejected instructions on stderr and the batch result on stdout.
fn conclude(result: Result<BatchReport, BatchFailure>) -> Result<BatchReport, PrinterError> {
    let report = match &result {
        Ok(report) => report,
        Err(failure) => &failure.report,
    };
    for outcome in report.failures() {
        if let Some(error) = &outcome.error {
            eprintln!(
                "Invalid Instruction #{} ({}): {}",
                outcome.index, outcome.method, error
            );
        }
    }

    match result {
        Ok(report) => {
            println!("{}", report.message());
            Ok(report)
        }
        Err(failure) => {
            if let Some(index) = failure.instruction {
                eprintln!("Batch stopped at instruction #{}", index);
            }
            Err(failure.error)
        }
    }
}

fn describe(op: &Op) -> String {
    match op {
        Op::PrintBitmap(bitmap) => format!("PrintBitmap {}x{}", bitmap.width(), bitmap.height()),
        other => format!("{:?}", other),
    }
}

fn print_journal(program: &Program) {
    println!("Ops ({}):", program.len());
    for (i, op) in program.iter().enumerate() {
        println!("  {:>4}  {}", i, describe(op));
    }
}

fn print_hex(data: &[u8]) {
    println!("Bytes ({}):", data.len());
    for (row, chunk) in data.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        println!("  {:08X}  {}", row * 16, hex.join(" "));
    }
}
