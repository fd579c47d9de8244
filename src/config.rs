//! Parser configuration
//!
//! The only process-wide state of the front end is the version cutoff used to
//! decide whether a `/*!NNNNN ... */` comment is scanned as SQL. It lives in a
//! single atomic cell with a fixed default and is never reset implicitly.
//! Every lexer snapshots the value when it is constructed.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use log::info;
use serde::{Deserialize, Serialize};

use crate::charset::Charset;
use crate::error::{Result, SqlError};

/// Server version the front end emulates by default (5.5.99)
pub const DEFAULT_VERSION_CUTOFF: u32 = 50599;

/// Largest version a five digit vendor comment can declare
const MAX_VERSION: u32 = 99999;

static VERSION_CUTOFF: AtomicU32 = AtomicU32::new(DEFAULT_VERSION_CUTOFF);

/// Current process-wide vendor comment version cutoff
pub fn version_cutoff() -> u32 {
    VERSION_CUTOFF.load(Ordering::Acquire)
}

/// Replace the process-wide vendor comment version cutoff.
///
/// Lexers that already exist keep the value they were created with.
pub fn set_version_cutoff(version: u32) {
    VERSION_CUTOFF.store(version, Ordering::Release);
}

/// Parser settings loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Five digit MySQL version, e.g. 50599 for 5.5.99
    pub version_cutoff: u32,
    /// Charset used to encode text input
    pub charset: Charset,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            version_cutoff: DEFAULT_VERSION_CUTOFF,
            charset: Charset::Utf8,
        }
    }
}

impl ParserConfig {
    /// Load a configuration file, e.g. `{"version_cutoff": 50700, "charset": "latin1"}`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: ParserConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.version_cutoff > MAX_VERSION {
            return Err(SqlError::Config(format!(
                "version_cutoff {} is not a five digit MySQL version",
                self.version_cutoff
            )));
        }
        Ok(())
    }

    /// Apply the process-wide parts of this configuration
    pub fn install(&self) {
        info!(
            "Vendor comment version cutoff set to {} (charset {})",
            self.version_cutoff, self.charset
        );
        set_version_cutoff(self.version_cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.version_cutoff, DEFAULT_VERSION_CUTOFF);
        assert_eq!(config.charset, Charset::Utf8);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"charset": "latin1"}"#).unwrap();
        assert_eq!(config.version_cutoff, DEFAULT_VERSION_CUTOFF);
        assert_eq!(config.charset, Charset::Latin1);
    }

    #[test]
    fn test_validate_rejects_six_digit_version() {
        let config = ParserConfig { version_cutoff: 100000, ..ParserConfig::default() };
        assert!(config.validate().is_err());
    }
}
