//! JSON persistence for [`BufferConfig`].
//!
//! Only the configuration is stored; buffer contents are never serialized.

use std::path::Path;

use crate::core::config::BufferConfig;
use crate::error::{Result, RingBufferError};

/// Writes a buffer configuration as pretty-printed JSON.
pub fn write_config_json(path: &Path, config: &BufferConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).map_err(|e| {
        RingBufferError::InvalidFormat(format!("failed to serialize buffer config: {}", e))
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads a buffer configuration from JSON. Missing fields default to zero/false.
pub fn read_config_json(path: &Path) -> Result<BufferConfig> {
    let data = std::fs::read_to_string(path)?;
    parse_config_json(&data).map_err(|e| match e {
        RingBufferError::InvalidFormat(msg) => {
            RingBufferError::InvalidFormat(format!("{} ({})", msg, path.display()))
        }
        other => other,
    })
}

/// Parses a buffer configuration from a JSON string.
pub fn parse_config_json(data: &str) -> Result<BufferConfig> {
    serde_json::from_str(data).map_err(|e| {
        RingBufferError::InvalidFormat(format!("failed to parse buffer config: {}", e))
    })
}
