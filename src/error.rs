use std::fmt;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    MissingColumn,
    InvalidDate,
    UnreadableInput,
}

impl SchemaErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaErrorKind::MissingColumn => "MISSING_COLUMN",
            SchemaErrorKind::InvalidDate => "INVALID_DATE",
            SchemaErrorKind::UnreadableInput => "UNREADABLE_INPUT",
        }
    }
}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal rejection of an upload. `row` is the 1-based data row (header excluded).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", describe(.kind, .column, .row))]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub column: Option<String>,
    pub row: Option<usize>,
    pub reason: Option<String>,
}

impl SchemaError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        let column = column.into();
        warn!(target: "app::ingest", %column, "required column missing");
        Self {
            kind: SchemaErrorKind::MissingColumn,
            column: Some(column),
            row: None,
            reason: None,
        }
    }

    pub fn invalid_date(row: usize, value: &str) -> Self {
        warn!(target: "app::ingest", row, value, "unparseable date");
        Self {
            kind: SchemaErrorKind::InvalidDate,
            column: Some("Date".to_string()),
            row: Some(row),
            reason: Some(format!("cannot parse {value:?} as YYYY-MM-DD")),
        }
    }

    pub fn unreadable(row: Option<usize>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(target: "app::ingest", ?row, %reason, "unreadable input");
        Self {
            kind: SchemaErrorKind::UnreadableInput,
            column: None,
            row,
            reason: Some(reason),
        }
    }

    pub fn details(&self) -> JsonValue {
        serde_json::json!({
            "kind": self.kind.as_str(),
            "column": self.column,
            "row": self.row,
            "reason": self.reason,
        })
    }
}

fn describe(kind: &SchemaErrorKind, column: &Option<String>, row: &Option<usize>) -> String {
    let mut out = kind.as_str().to_string();
    if let Some(column) = column {
        out.push_str(&format!(" column={column}"));
    }
    if let Some(row) = row {
        out.push_str(&format!(" row={row}"));
    }
    out
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("settings format error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        warn!(target: "app::session", %session_id, "session not found");
        AppError::SessionNotFound(session_id)
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            AppError::Schema(err) => Some(err),
            _ => None,
        }
    }
}
