//! Engine configuration that callers can serialize/deserialize.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default read size of a pipeline, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Knobs for table construction and stream driving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many bytes a pipeline asks its reader for at a time.
    pub chunk_size: usize,

    /// Also decode emoji written without their U+FE0F presentation selector.
    ///
    /// Stripped keys that reduce to a single BMP codepoint are never indexed,
    /// so text symbols like `©` or `❤` stay literal.
    pub lenient_variation_selectors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            lenient_variation_selectors: true,
        }
    }
}

impl Config {
    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than zero".into()));
        }
        Ok(())
    }
}
