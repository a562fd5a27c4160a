use std::fmt;

use jdr_types::{JdrVersion, TypeError};
use thiserror::Error;

use crate::tag::FieldTag;

/// Position in a text stream. Lines and columns count from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Column {}", self.line, self.column)
    }
}

/// A malformed or out-of-range value found while loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidFormat {
    pub tag: FieldTag,
    /// The offending raw value.
    pub value: String,
    pub location: Option<Location>,
}

impl fmt::Display for InvalidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{} (found '{}')", self.tag.describe(), self.value)
    }
}

impl std::error::Error for InvalidFormat {}

fn at(location: &Option<Location>) -> String {
    location.map(|l| format!("{l}: ")).unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum JdrError {
    #[error("{0}")]
    InvalidFormat(#[from] InvalidFormat),

    #[error("{type_name} is not supported in version {version}")]
    UnsupportedVersion {
        type_name: &'static str,
        version: JdrVersion,
    },

    #[error("invalid JDR/AJR version: {0}")]
    InvalidVersion(String),

    #[error("invalid settings flag: {0}")]
    InvalidSettingsFlag(u8),

    #[error("missing top-level group")]
    MissingTopLevelGroup,

    #[error("a path must have at least one segment")]
    EmptyPath,

    #[error("{}word exceeds buffer of {limit} characters", at(.location))]
    BufferOverflow {
        limit: usize,
        location: Option<Location>,
    },

    #[error("cannot reset stream: mark not set or read limit exceeded")]
    MarkInvalidated,

    #[error("file declares charset {declared} but was decoded as {decoded}")]
    CharsetMismatch { declared: String, decoded: String },

    #[error("character {character:?} cannot be encoded in {charset}")]
    Unmappable { charset: String, character: char },

    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),

    #[error("{listener} listener cannot handle {found}")]
    WrongVariant {
        listener: &'static str,
        found: String,
    },

    #[error("no listener registered for {0}")]
    NoListener(String),

    #[error("invalid paint configuration '{spec}': {reason}")]
    InvalidConfig { spec: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TypeError> for JdrError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidVersion(v) => Self::InvalidVersion(v),
            TypeError::InvalidSettingsFlag(f) => Self::InvalidSettingsFlag(f),
            other => Self::Config(other.to_string()),
        }
    }
}

impl JdrError {
    /// The invalid-value details, if this is a format error.
    pub fn invalid_format(&self) -> Option<&InvalidFormat> {
        match self {
            Self::InvalidFormat(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

pub type JdrResult<T> = Result<T, JdrError>;
