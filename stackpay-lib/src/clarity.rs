//! Typed arguments of a contract call.
//!
//! The wallet performs the actual serialization; these values only carry the
//! type tag alongside the payload and render as Clarity literals for display.

use std::fmt;

use serde::Serialize;

/// A typed contract-call argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum ClarityValue {
    /// Standard principal (an address).
    Principal(String),
    /// Unsigned 128-bit integer.
    #[serde(rename = "uint")]
    UInt(u128),
    /// UTF-8 string.
    StringUtf8(String),
    /// The empty optional.
    None,
}

impl ClarityValue {
    /// Principal argument.
    pub fn principal(address: impl Into<String>) -> Self {
        Self::Principal(address.into())
    }

    /// Unsigned integer argument.
    pub fn uint(value: impl Into<u128>) -> Self {
        Self::UInt(value.into())
    }

    /// UTF-8 string argument.
    pub fn string_utf8(value: impl Into<String>) -> Self {
        Self::StringUtf8(value.into())
    }

    /// A string when present, otherwise an explicit `none`.
    ///
    /// Empty strings encode as `none`.
    pub fn optional_string_utf8(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => Self::string_utf8(s),
            _ => Self::None,
        }
    }

    /// Clarity type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Principal(_) => "principal",
            Self::UInt(_) => "uint",
            Self::StringUtf8(_) => "string-utf8",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Principal(address) => write!(f, "'{address}"),
            Self::UInt(value) => write!(f, "u{value}"),
            Self::StringUtf8(s) => {
                f.write_str("u\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Self::None => f.write_str("none"),
        }
    }
}
