use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A JDR/AJR file format version.
///
/// Versions form a small closed, ordered set. Every save or load runs at
/// exactly one of them, and each version has an exact string token that is
/// written into the file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JdrVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V1_8,
    V1_9,
    V2_0,
    V2_1,
    V2_2,
}

impl JdrVersion {
    /// All valid versions, oldest first.
    pub const ALL: [JdrVersion; 13] = [
        Self::V1_0,
        Self::V1_1,
        Self::V1_2,
        Self::V1_3,
        Self::V1_4,
        Self::V1_5,
        Self::V1_6,
        Self::V1_7,
        Self::V1_8,
        Self::V1_9,
        Self::V2_0,
        Self::V2_1,
        Self::V2_2,
    ];

    /// The newest version this library writes by default.
    pub const LATEST: JdrVersion = Self::V2_2;

    /// The exact header token for this version.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
            Self::V1_7 => "1.7",
            Self::V1_8 => "1.8",
            Self::V1_9 => "1.9",
            Self::V2_0 => "2.0",
            Self::V2_1 => "2.1",
            Self::V2_2 => "2.2",
        }
    }

    /// Versions at or after `self`.
    pub fn and_later(self) -> impl Iterator<Item = JdrVersion> {
        Self::ALL.into_iter().filter(move |v| *v >= self)
    }
}

impl fmt::Display for JdrVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JdrVersion {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| TypeError::InvalidVersion(s.to_string()))
    }
}

impl TryFrom<String> for JdrVersion {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JdrVersion> for String {
    fn from(version: JdrVersion) -> Self {
        version.as_str().to_string()
    }
}

impl Default for JdrVersion {
    fn default() -> Self {
        Self::LATEST
    }
}
