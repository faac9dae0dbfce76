//! Shared helpers for command handlers: rule and state files.

use std::path::Path;

use ddcloud_core::{FirewallRuleFields, ResourceData};

use crate::error::CliError;

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })
}

/// Parse a rule declaration from a TOML file.
pub fn load_rule(path: &Path) -> Result<FirewallRuleFields, CliError> {
    Ok(toml::from_str(&read_file(path)?)?)
}

/// Load a state file written by a previous command.
pub fn load_state(path: &Path) -> Result<ResourceData, CliError> {
    Ok(serde_json::from_str(&read_file(path)?)?)
}

/// Write a state file, replacing any previous contents.
pub fn save_state(path: &Path, data: &ResourceData) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })
}
