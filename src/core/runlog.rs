//! Run log
//!
//! An ordered, append-only log of severity-tagged entries shared by every
//! step of one export run. Steps at any nesting depth record into it through
//! a cloned [`RunLog`] handle; the reporter reads it once the pipeline has
//! settled.
//!
//! Entries serialize to the conventional batch-tool layout:
//!
//! ```json
//! { "ts": "2024-03-01T12:00:00Z", "level": "error", "error": { "name": "ApiError", "message": "..." } }
//! ```

use crate::domain::{ApiError, SpacedumpError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Structured description of a failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureDetail {
    /// Error kind, e.g. `ApiError`
    pub name: String,

    /// Human-readable message
    pub message: String,

    /// Title of the step that failed, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,

    /// Extra machine-readable context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl FailureDetail {
    /// Creates a failure with a name and message
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            step: None,
            details: None,
        }
    }

    /// Sets the failed step title
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Attaches extra context
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Describes an error; a step failure is unwrapped into its step title and cause
    pub fn from_error(err: &SpacedumpError) -> Self {
        match err {
            SpacedumpError::StepFailed { step, source } => {
                Self::from_error(source).with_step(step.clone())
            }
            SpacedumpError::Api(api) => {
                let detail = Self::new(err.kind_name(), api.to_string());
                match api {
                    ApiError::ServerError { status, .. } | ApiError::ClientError { status, .. } => {
                        detail.with_details(serde_json::json!({ "status": status }))
                    }
                    _ => detail,
                }
            }
            other => Self::new(other.kind_name(), other.to_string()),
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.step {
            Some(step) => write!(f, "{}: {} ({})", self.name, self.message, step),
            None => write!(f, "{}: {}", self.name, self.message),
        }
    }
}

/// Payload of a log entry, keyed by severity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogPayload {
    Info(String),
    Warning(String),
    Error(FailureDetail),
}

/// One entry of the run log
///
/// Constructed through [`LogEntry::info`], [`LogEntry::warning`] and
/// [`LogEntry::error`] so that `level` always matches the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    ts: DateTime<Utc>,
    level: Severity,
    #[serde(flatten)]
    payload: LogPayload,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self::at(Utc::now(), LogPayload::Info(message.into()))
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::at(Utc::now(), LogPayload::Warning(message.into()))
    }

    pub fn error(detail: FailureDetail) -> Self {
        Self::at(Utc::now(), LogPayload::Error(detail))
    }

    /// Error entry describing a failed run or step
    pub fn from_error(err: &SpacedumpError) -> Self {
        Self::error(FailureDetail::from_error(err))
    }

    /// Entry with an explicit timestamp
    pub fn at(ts: DateTime<Utc>, payload: LogPayload) -> Self {
        let level = match payload {
            LogPayload::Info(_) => Severity::Info,
            LogPayload::Warning(_) => Severity::Warning,
            LogPayload::Error(_) => Severity::Error,
        };
        Self { ts, level, payload }
    }

    pub fn ts(&self) -> DateTime<Utc> {
        self.ts
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn payload(&self) -> &LogPayload {
        &self.payload
    }

    /// Shown to the user at the end of a run (warnings and errors)
    pub fn is_displayed(&self) -> bool {
        self.level != Severity::Info
    }

    /// Counts towards a hard failure
    pub fn is_error(&self) -> bool {
        self.level == Severity::Error
    }

    /// One-line rendering used in the end-of-run report
    pub fn summary_line(&self) -> String {
        let time = self.ts.format("%H:%M:%S");
        match &self.payload {
            LogPayload::Info(message) => format!("{time} - {message}"),
            LogPayload::Warning(message) => format!("{time} - Warning: {message}"),
            LogPayload::Error(detail) => format!("{time} - Error: {detail}"),
        }
    }
}

/// Shared handle to the run log
///
/// Cloning the handle shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RunLog {
    /// Creates an empty log for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry
    pub fn record(&self, entry: LogEntry) {
        match entry.payload() {
            LogPayload::Info(message) => tracing::debug!(message = %message, "Run log info"),
            LogPayload::Warning(message) => tracing::warn!(message = %message, "Run log warning"),
            LogPayload::Error(detail) => tracing::error!(
                name = %detail.name,
                step = ?detail.step,
                message = %detail.message,
                "Run log error"
            ),
        }
        self.lock().push(entry);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(LogEntry::info(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.record(LogEntry::warning(message));
    }

    pub fn error(&self, detail: FailureDetail) {
        self.record(LogEntry::error(detail));
    }

    /// Snapshot of every entry, in record order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Consumes the handle, returning every entry
    ///
    /// Entries are cloned when other handles are still alive.
    pub fn into_entries(self) -> Vec<LogEntry> {
        match Arc::try_unwrap(self.entries) {
            Ok(store) => store.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }

    /// Warning and error entries, in record order
    pub fn display_log(&self) -> Vec<LogEntry> {
        self.lock().iter().filter(|e| e.is_displayed()).cloned().collect()
    }

    /// Error entries, in record order
    pub fn error_log(&self) -> Vec<LogEntry> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // Entries are only ever appended, so a poisoned store is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
