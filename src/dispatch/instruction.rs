//! The caller-facing instruction format.
//!
//! ```json
//! {
//!   "payload": [
//!     { "method": "align",   "params": ["center"] },
//!     { "method": "println", "params": ["THANK YOU"] }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::PrinterError;

/// One requested action: a method name and its positional parameters.
///
/// An item of the request that is not a `{"method", "params"}` object still
/// becomes an `Instruction`, carrying the reason it was malformed. The batch
/// runner rejects it like an instruction with bad arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Instruction {
    pub method: String,
    #[serde(default)]
    pub params: Option<Vec<Value>>,
    #[serde(skip)]
    malformed: Option<String>,
}

impl Instruction {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params: Some(params),
            malformed: None,
        }
    }

    /// Read one request item. Never fails; see [`Instruction::malformed`].
    pub fn from_value(value: &Value) -> Self {
        match Instruction::deserialize(value) {
            Ok(instruction) => instruction,
            Err(e) => Self {
                method: value
                    .get("method")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                params: None,
                malformed: Some(e.to_string()),
            },
        }
    }

    pub fn params(&self) -> Option<&[Value]> {
        self.params.as_deref()
    }

    /// Why the request item could not be read, if it could not.
    pub fn malformed(&self) -> Option<&str> {
        self.malformed.as_deref()
    }
}

/// A batch request as received from the caller.
///
/// Items are kept as raw JSON so that one bad item does not reject the
/// request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub payload: Option<Vec<Value>>,
}

impl Payload {
    /// Parse a JSON request into its instruction list.
    ///
    /// A missing or `null` payload is rejected with "Nothing to do"; an empty
    /// list is accepted and prints only the trailing feed. Malformed items
    /// are returned as malformed instructions.
    pub fn parse(json: &str) -> Result<Vec<Instruction>, PrinterError> {
        let request: Payload =
            serde_json::from_str(json).map_err(|e| PrinterError::Payload(e.to_string()))?;
        let items = request
            .payload
            .ok_or_else(|| PrinterError::Payload("Nothing to do".into()))?;
        Ok(items.iter().map(Instruction::from_value).collect())
    }
}
