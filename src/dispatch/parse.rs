//! Conversion from a named, loosely typed instruction to a [`Command`].
//!
//! Parsing is all-or-nothing: a command is only produced once every parameter
//! has been validated, so a rejected instruction never reaches the printer.

use serde_json::Value;

use super::method::Method;
use super::params::Params;
use crate::error::PrinterError;
use crate::ir::Encoder;
use crate::printer::command::*;
use crate::protocol::barcode::{barcode1d, qr};

/// Parse one instruction.
///
/// Images are decoded here, through `encoder`, so a corrupt bitmap is
/// rejected like any other bad argument.
///
/// ## Errors
///
/// - [`PrinterError::UnknownMethod`] when `name` is not in the table
/// - [`PrinterError::InvalidArgument`] for missing or mistyped parameters,
///   unrecognized tokens and undecodable images
pub fn parse_command<E: Encoder + ?Sized>(
    name: &str,
    params: Option<&[Value]>,
    encoder: &E,
) -> Result<Command, PrinterError> {
    let method: Method = name.parse()?;
    let p = Params::new(method, params)?;

    let command = match method {
        Method::Align => Command::Align(AlignArgs {
            alignment: p.string(0)?.parse()?,
        }),
        Method::Barcode => {
            let data = p.string(0)?;
            let symbology = p.i32(1)?;
            let len = barcode1d::payload_len(data.as_bytes(), symbology);
            if len > barcode1d::MAX_DATA_LEN {
                return Err(PrinterError::invalid(format!(
                    "barcode data is {len} bytes, at most {} fit",
                    barcode1d::MAX_DATA_LEN
                )));
            }
            Command::Barcode(BarcodeArgs {
                data,
                symbology,
                height: p.i32(2)?,
                width: p.i32(3)?,
                text_position: p.i32(4)?,
            })
        }
        Method::Bitmap => Command::Bitmap(BitmapArgs {
            bitmap: encoder.decode_image(&p.bytes(0)?)?,
        }),
        Method::Bold => Command::Bold(BoldArgs {
            value: p.opt_bool(0)?,
        }),
        Method::Darkness => Command::Darkness(DarknessArgs { level: p.i32(0)? }),
        Method::FontSize => Command::FontSize(FontSizeArgs {
            width: p.int(0)?,
            height: p.int(1)?,
        }),
        Method::LineSpacing => Command::LineSpacing(LineSpacingArgs {
            value: p.opt_i32(0)?,
        }),
        Method::NewLine => Command::NewLine(NewLineArgs {
            count: p.opt_u16(0)?,
        }),
        Method::Print => Command::Print(TextArgs {
            text: p.opt_string(0)?,
        }),
        Method::Println => Command::Println(TextArgs {
            text: p.opt_string(0)?,
        }),
        Method::Qr => Command::Qr(QrArgs {
            data: qr_data(p.string(0)?)?,
            module_size: p.i32(1)?,
            error_level: p.i32(2)?,
        }),
        Method::Qr2 => Command::Qr2(Qr2Args {
            first: qr_data(p.string(0)?)?,
            second: qr_data(p.string(1)?)?,
            module_size: p.i32(2)?,
            error_level: p.i32(3)?,
        }),
        Method::Underline => Command::Underline(UnderlineArgs {
            mode: p.string(0)?.parse()?,
        }),
    };

    Ok(command)
}

fn qr_data(data: String) -> Result<String, PrinterError> {
    if data.len() > qr::MAX_DATA_LEN {
        return Err(PrinterError::invalid(format!(
            "QR data is {} bytes, at most {} fit",
            data.len(),
            qr::MAX_DATA_LEN
        )));
    }
    Ok(data)
}
