//! Positional access to a loosely typed parameter list.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use super::method::Method;
use crate::error::PrinterError;

/// The parameters of one instruction, checked against the method's arity.
///
/// Every accessor fails with [`PrinterError::InvalidArgument`] on a type
/// mismatch. Values beyond the method's arity are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    method: Method,
    values: &'a [Value],
}

impl<'a> Params<'a> {
    pub fn new(method: Method, values: Option<&'a [Value]>) -> Result<Self, PrinterError> {
        let values = values.ok_or_else(|| {
            PrinterError::invalid(format!("{method} requires a parameter list"))
        })?;
        if values.len() < method.arity() {
            return Err(PrinterError::invalid(format!(
                "{method} expects {} parameter(s), got {}",
                method.arity(),
                values.len()
            )));
        }
        Ok(Self { method, values })
    }

    fn slot(&self, index: usize) -> Result<&'a Value, PrinterError> {
        self.values.get(index).ok_or_else(|| {
            PrinterError::invalid(format!("{} is missing parameter {index}", self.method))
        })
    }

    fn mismatch(&self, index: usize, expected: &str, value: &Value) -> PrinterError {
        PrinterError::invalid(format!(
            "{} parameter {index}: expected {expected}, got {}",
            self.method,
            kind(value)
        ))
    }

    pub fn string(&self, index: usize) -> Result<String, PrinterError> {
        match self.slot(index)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.mismatch(index, "string", other)),
        }
    }

    pub fn opt_string(&self, index: usize) -> Result<Option<String>, PrinterError> {
        match self.slot(index)? {
            Value::Null => Ok(None),
            _ => self.string(index).map(Some),
        }
    }

    /// Any JSON integer that fits in an `i64`. Fractions are rejected.
    pub fn int(&self, index: usize) -> Result<i64, PrinterError> {
        let value = self.slot(index)?;
        value
            .as_i64()
            .ok_or_else(|| self.mismatch(index, "integer", value))
    }

    pub fn i32(&self, index: usize) -> Result<i32, PrinterError> {
        let raw = self.int(index)?;
        i32::try_from(raw).map_err(|_| {
            PrinterError::invalid(format!(
                "{} parameter {index}: {raw} is out of range",
                self.method
            ))
        })
    }

    pub fn opt_i32(&self, index: usize) -> Result<Option<i32>, PrinterError> {
        match self.slot(index)? {
            Value::Null => Ok(None),
            _ => self.i32(index).map(Some),
        }
    }

    pub fn opt_u16(&self, index: usize) -> Result<Option<u16>, PrinterError> {
        match self.slot(index)? {
            Value::Null => Ok(None),
            _ => {
                let raw = self.int(index)?;
                u16::try_from(raw).map(Some).map_err(|_| {
                    PrinterError::invalid(format!(
                        "{} parameter {index}: {raw} is not between 0 and {}",
                        self.method,
                        u16::MAX
                    ))
                })
            }
        }
    }

    pub fn opt_bool(&self, index: usize) -> Result<Option<bool>, PrinterError> {
        match self.slot(index)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            other => Err(self.mismatch(index, "bool or null", other)),
        }
    }

    /// Raw bytes, given either as an array of integers in `0..=255` or as a
    /// standard base64 string.
    pub fn bytes(&self, index: usize) -> Result<Vec<u8>, PrinterError> {
        match self.slot(index)? {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| self.mismatch(index, "byte array", item))
                })
                .collect(),
            Value::String(encoded) => STANDARD.decode(encoded).map_err(|e| {
                PrinterError::invalid(format!(
                    "{} parameter {index}: invalid base64: {e}",
                    self.method
                ))
            }),
            other => Err(self.mismatch(index, "byte array or base64 string", other)),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
