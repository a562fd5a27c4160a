use thiserror::Error;

/// Errors produced by document model operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid JDR/AJR version: {0}")]
    InvalidVersion(String),

    #[error("invalid settings flag: {0}")]
    InvalidSettingsFlag(u8),

    #[error("unknown {kind} id: {id}")]
    UnknownId { kind: &'static str, id: i64 },

    #[error("unknown {kind} name: {name}")]
    UnknownName { kind: &'static str, name: String },
}

pub type TypeResult<T> = Result<T, TypeError>;
