use std::path::Path;

use anyhow::Context;

use crate::resources::config::ConfigNode;

/**
 * This module contains all logic for loading config text from external files
 * and the lenient parsing helpers the config accessors build on.
 */
pub mod animation;
pub mod config;

pub fn load_string(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    Ok(txt)
}

/// Loads and parses a config file into its unnamed root node.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<ConfigNode> {
    let path = path.as_ref();
    let text = load_string(path)?;
    let node = ConfigNode::parse(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(node)
}

/// Parses a float, logging and returning 0 on failure.
pub fn safe_parse_f32(value: &str) -> f32 {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            log::warn!("Could not parse '{}' as a float, using 0", value);
            0.0
        }
    }
}

/// Parses a double, logging and returning 0 on failure.
pub fn safe_parse_f64(value: &str) -> f64 {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            log::warn!("Could not parse '{}' as a double, using 0", value);
            0.0
        }
    }
}

/// Parses an int, logging and returning 0 on failure.
pub fn safe_parse_i32(value: &str) -> i32 {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            log::warn!("Could not parse '{}' as an int, using 0", value);
            0
        }
    }
}

/// `true`, `yes` and `1` (any case) are true; anything else is false.
pub fn safe_parse_bool(value: &str) -> bool {
    let trimmed = value.trim();
    if ["true", "yes", "1"]
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return true;
    }
    if !["false", "no", "0"]
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        log::warn!("Could not parse '{}' as a bool, using false", value);
    }
    false
}
