use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

use super::route::route_signature;

const KIND_HEADER: &str = "header";
const KIND_METRICS: &str = "metrics";
const KIND_PATCH: &str = "patch";

/// One parsed log line. Only lives until it has been classified.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub ts: u64,
    pub kind: RecordKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    Header(Box<HeaderEntry>),
    Metrics(MetricsEntry),
    Patch(PatchEntry),
    Other { kind: String, entry: Value },
}

/// Facts the agent writes when a monitoring session starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argv: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_json: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HeaderEntry {
    /// Decodes a header payload. Any object starts a run: when a known
    /// field carries an unexpected type, every field is kept in `extra`
    /// instead of failing the record.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is not an object.
    pub fn from_value(entry: Value) -> Result<Self, RecordError> {
        let Value::Object(fields) = entry else {
            return Err(RecordError::InvalidPayload {
                kind: KIND_HEADER,
                detail: "expected an object".to_owned(),
            });
        };
        let typed = serde_json::from_value(Value::Object(fields.clone()));
        Ok(typed.unwrap_or_else(|_err| Self {
            extra: fields,
            ..Self::default()
        }))
    }
}

/// A single timed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEntry {
    pub method: String,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub url: String,
    /// Elapsed time in microseconds.
    pub et: u64,
    pub status_code: u16,
}

impl MetricsEntry {
    #[must_use]
    pub fn signature(&self) -> String {
        route_signature(&self.method, &self.protocol, &self.host, self.port, &self.url)
    }
}

/// Outcome of the agent instrumenting one dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl PatchEntry {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Parses and validates one log line.
///
/// # Errors
///
/// Returns the reason the line is not a usable record.
pub fn parse_record(line: &str) -> Result<LogRecord, RecordError> {
    let value: Value = serde_json::from_str(line).map_err(|_err| RecordError::InvalidJson)?;
    let Value::Object(mut object) = value else {
        return Err(RecordError::InvalidEntry);
    };

    let ts = object
        .get("ts")
        .and_then(Value::as_u64)
        .ok_or(RecordError::InvalidEntry)?;
    let Some(Value::String(kind)) = object.remove("type") else {
        return Err(RecordError::InvalidEntry);
    };
    let entry = object
        .remove("entry")
        .filter(|entry| !entry.is_null())
        .ok_or(RecordError::InvalidEntry)?;

    let kind = match kind.as_str() {
        KIND_HEADER => RecordKind::Header(Box::new(HeaderEntry::from_value(entry)?)),
        KIND_METRICS => RecordKind::Metrics(decode(KIND_METRICS, entry)?),
        KIND_PATCH => RecordKind::Patch(decode(KIND_PATCH, entry)?),
        _ => RecordKind::Other { kind, entry },
    };
    Ok(LogRecord { ts, kind })
}

fn decode<T>(kind: &'static str, entry: Value) -> Result<T, RecordError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(entry).map_err(|err| RecordError::InvalidPayload {
        kind,
        detail: payload_detail(&err),
    })
}

/// Reduces a decode error to its category and expectation, dropping the
/// offending value so equal problems share one tally key.
fn payload_detail(err: &serde_json::Error) -> String {
    let message = err.to_string();
    match message.split_once(", expected ") {
        Some((problem, expected)) => {
            let problem = problem.split_once(':').map_or(problem, |(head, _)| head);
            format!("{}, expected {}", problem, expected)
        }
        None => message,
    }
}
