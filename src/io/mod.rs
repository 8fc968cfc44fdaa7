//! Loading and storing buffer configurations.

pub mod config_json;

pub use config_json::{parse_config_json, read_config_json, write_config_json};
