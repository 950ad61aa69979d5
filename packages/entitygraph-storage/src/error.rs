//! Error types for entitygraph-storage

use std::fmt;
use thiserror::Error;

/// What part of the store failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// SQLite rejected a statement or connection
    Database,
    /// A reserved-collection value could not be (de)serialized
    Serialization,
    /// An identifier would not survive the space-joined list encoding
    InvalidIdentifier,
    /// A batch could not be committed
    Transaction,
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Database => "database",
            ErrorKind::Serialization => "serialization",
            ErrorKind::InvalidIdentifier => "invalid_identifier",
            ErrorKind::Transaction => "transaction",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Store failure: a kind, a readable message and the underlying cause
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<BoxedSource>,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        StorageError {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError {
            source: Some(Box::new(source)),
            ..self
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// `identifier` (listed under `key`) is empty or contains the list separator
    pub fn invalid_identifier(key: &str, identifier: &str) -> Self {
        Self::new(
            ErrorKind::InvalidIdentifier,
            format!(
                "Identifier {:?} under key {:?} is empty or contains a space",
                identifier, key
            ),
        )
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transaction, message)
    }

    /// True for failures caused by the data written, not by the backend
    pub fn is_invalid_input(&self) -> bool {
        self.kind == ErrorKind::InvalidIdentifier
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::database(format!("SQLite error: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::new(ErrorKind::IO, format!("I/O error: {}", err)).with_source(err)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
