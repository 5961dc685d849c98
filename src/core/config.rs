//! OCT-004: oct.yaml parsing and validation.
//!
//! Parses oct.yaml and validates structural constraints:
//! - Version must be "1.0"
//! - Every key under `variables` must name a container field

use super::settings::{AnsibleSettings, ExecutionContext};
use super::variables::{ExtraVars, Field, PlaybookExtraVariables, VariableOverrides};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Root configuration for an oct run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OctConfig {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Ansible inventory passed as `-i`
    #[serde(default)]
    pub inventory: Option<PathBuf>,

    /// Overrides for container fields, by bare field name
    #[serde(default)]
    pub variables: IndexMap<String, Value>,

    /// Partial extra-variable mapping, by full variable name
    #[serde(default)]
    pub playbook_variables: ExtraVars,
}

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse an oct.yaml file from disk.
pub fn parse_config_file(path: &Path) -> Result<OctConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_config(&content)
}

/// Parse an oct.yaml from a string.
pub fn parse_config(yaml: &str) -> Result<OctConfig, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed config. Returns a list of errors (empty = valid).
pub fn validate_config(config: &OctConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", config.version),
        });
    }

    for key in config.variables.keys() {
        if let Err(e) = key.parse::<Field>() {
            errors.push(ValidationError {
                message: format!("variables: {}", e),
            });
        }
    }

    errors
}

/// Build the execution context for a validated config.
pub fn build_context(
    config: &OctConfig,
    settings: AnsibleSettings,
) -> Result<ExecutionContext, String> {
    let overrides = VariableOverrides::from_map(&config.variables).map_err(|e| e.to_string())?;
    Ok(ExecutionContext {
        settings,
        variables: PlaybookExtraVariables::new(overrides),
        playbook_variables: config.playbook_variables.clone(),
        inventory: config.inventory.clone(),
    })
}

/// Split a `KEY=VALUE` argument. `true`/`false` become booleans and `~` or
/// `null` becomes null; any other text is kept verbatim as a string.
pub fn parse_assignment(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", arg));
    }
    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "~" | "null" => Value::Null,
        _ => Value::String(raw.to_string()),
    };
    Ok((key.to_string(), value))
}

/// Template written by `oct init`.
pub fn default_template() -> String {
    let vars = PlaybookExtraVariables::default();
    let mut out = String::from("version: \"1.0\"\n\n# inventory: inventory/hosts\n\nvariables:\n");
    for (field, value) in &vars {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!("  {}: {}\n", field, rendered));
    }
    out.push_str("\nplaybook_variables: {}\n");
    out
}
