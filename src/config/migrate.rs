//! Keeps older configuration files loadable: keys added in later versions
//! are reported and, on request, written back with their default value.

use super::Config;
use crate::errors::AppResult;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys present in the default config but missing from `content`.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let current: Value = serde_yaml::from_str(content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    let empty = Mapping::new();
    let current_map = current.as_mapping().unwrap_or(&empty);

    let mut missing = Vec::new();
    if let Some(default_map) = defaults.as_mapping() {
        for key in default_map.keys() {
            if !current_map.contains_key(key)
                && let Some(name) = key.as_str()
            {
                missing.push(name.to_string());
            }
        }
    }
    Ok(missing)
}

/// Add every missing key with its default value.
///   Returns the names of the keys that were added (empty → file untouched).
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let missing = missing_keys(&content)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut current: Value = serde_yaml::from_str(&content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    if current.as_mapping().is_none() {
        current = Value::Mapping(Mapping::new());
    }

    if let (Some(map), Some(default_map)) = (current.as_mapping_mut(), defaults.as_mapping()) {
        for name in &missing {
            let key = Value::String(name.clone());
            if let Some(v) = default_map.get(&key) {
                map.insert(key, v.clone());
            }
        }
    }

    fs::write(path, serde_yaml::to_string(&current)?)?;
    Ok(missing)
}
