//! Environment variable configuration overrides.
//!
//! Mirrors git's `GIT_CONFIG_COUNT` / `GIT_CONFIG_KEY_<n>` / `GIT_CONFIG_VALUE_<n>`
//! mechanism: a numbered sequence of key/value pairs passed through the
//! environment, read before any config file so `add_command_override` and
//! file-scoped values can still take precedence over them at lookup time.

use bstr::BString;

use crate::error::ConfigError;
use crate::{ConfigEntry, ConfigKey, ConfigScope};

/// Load `GIT_CONFIG_KEY_<n>`/`GIT_CONFIG_VALUE_<n>` pairs from the environment.
///
/// `GIT_CONFIG_COUNT` gives the number of pairs; a missing or non-numeric
/// count is treated as zero. A missing key or value for a given index is a
/// `ConfigError::InvalidKey`, matching git's refusal to silently drop a
/// malformed override.
pub fn load_env_overrides() -> Result<Vec<ConfigEntry>, ConfigError> {
    let count = match std::env::var("GIT_CONFIG_COUNT") {
        Ok(v) => v
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidKey(format!("GIT_CONFIG_COUNT is not a number: {v}")))?,
        Err(_) => 0,
    };

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let key_var = format!("GIT_CONFIG_KEY_{i}");
        let value_var = format!("GIT_CONFIG_VALUE_{i}");

        let raw_key = std::env::var(&key_var)
            .map_err(|_| ConfigError::InvalidKey(format!("missing {key_var}")))?;
        let raw_value = std::env::var(&value_var)
            .map_err(|_| ConfigError::InvalidKey(format!("missing {value_var}")))?;

        let key = ConfigKey::parse(&raw_key)?;
        entries.push(ConfigEntry {
            key,
            value: Some(BString::from(raw_value.into_bytes())),
            scope: ConfigScope::Command,
            source_file: None,
            line_number: None,
        });
    }

    Ok(entries)
}
