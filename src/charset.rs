//! Connection character sets
//!
//! The lexer works on bytes. Text handed to the parse entry points is encoded
//! with the connection charset first, and identifier/string payloads are
//! decoded back with the same charset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlError};

/// Character sets understood by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Utf8,
    Utf8mb4,
    Latin1,
    Ascii,
    Binary,
}

impl Charset {
    /// Encode text into the byte form the lexer scans
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 | Charset::Utf8mb4 | Charset::Binary => Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(c as u32).map_err(|_| {
                        SqlError::Charset(format!("Character '{}' has no latin1 encoding", c))
                    })
                })
                .collect(),
            Charset::Ascii => {
                if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(SqlError::Charset(format!(
                        "Character '{}' has no ascii encoding",
                        c
                    )));
                }
                Ok(text.as_bytes().to_vec())
            }
        }
    }

    /// Decode a token payload back to text
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            _ => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// MySQL name of the charset
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf8",
            Charset::Utf8mb4 => "utf8mb4",
            Charset::Latin1 => "latin1",
            Charset::Ascii => "ascii",
            Charset::Binary => "binary",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf8mb3" => Ok(Charset::Utf8),
            "utf8mb4" => Ok(Charset::Utf8mb4),
            "latin1" | "iso-8859-1" => Ok(Charset::Latin1),
            "ascii" | "us-ascii" => Ok(Charset::Ascii),
            "binary" => Ok(Charset::Binary),
            other => Err(SqlError::Charset(format!("Unknown character set: '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_round_trip() {
        let bytes = Charset::Latin1.encode("café").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(Charset::Latin1.decode(&bytes), "café");
    }

    #[test]
    fn test_unrepresentable_text_fails() {
        assert!(Charset::Latin1.encode("日本").is_err());
        assert!(Charset::Ascii.encode("é").is_err());
        assert!(Charset::Utf8.encode("日本").is_ok());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("UTF8MB4".parse::<Charset>().unwrap(), Charset::Utf8mb4);
        assert!("klingon".parse::<Charset>().is_err());
    }
}
