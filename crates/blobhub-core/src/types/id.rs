//! Typed application identifier.
//!
//! Application ids arrive as loosely typed input (JSON numbers or strings).
//! They are parsed strictly: anything that is not a base-10 integer is
//! rejected instead of being folded into a shared fallback id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identifier of the application that owns a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawAppId", into = "i64")]
pub struct AppId(i64);

impl AppId {
    /// Create an identifier from an integer.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the inner integer value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parse an identifier from text, rejecting anything but an integer.
    ///
    /// Surrounding whitespace and a leading sign are accepted; leading
    /// zeros collapse (`"007"` and `"7"` are the same application).
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim();
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| AppError::validation(format!("Invalid application id: '{input}'")))
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for AppId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<AppId> for i64 {
    fn from(id: AppId) -> i64 {
        id.0
    }
}

/// Wire shapes accepted for an application id.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAppId {
    Number(i64),
    Text(String),
}

impl TryFrom<RawAppId> for AppId {
    type Error = AppError;

    fn try_from(raw: RawAppId) -> Result<Self, Self::Error> {
        match raw {
            RawAppId::Number(n) => Ok(Self(n)),
            RawAppId::Text(s) => Self::parse(&s),
        }
    }
}
