//! OCT-007: Argument groups shared by the automation subcommands.
//!
//! `OutputOptions` carries the Ansible verbosity, dry-run, and debug flags;
//! it is flattened into every subcommand that runs Ansible. Settings are
//! derived from it only after clap has finished parsing, so an aborted
//! parse (bad flag, `--help`) never produces settings.

use crate::core::config::{self, OctConfig};
use crate::core::settings::{AnsibleSettings, ExecutionContext};
use clap::{ArgAction, Args};
use std::path::{Path, PathBuf};

/// Ansible output flags.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Ansible verbosity level. Repeat to increase.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Toggle Ansible dry-run mode.
    #[arg(short = 'C', long = "dry-run", visible_alias = "check")]
    pub dry_run: bool,

    /// Toggle Ansible debug mode.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl From<&OutputOptions> for AnsibleSettings {
    fn from(opts: &OutputOptions) -> Self {
        Self {
            // a bare `-v` matches the default level
            verbosity: opts.verbose.max(AnsibleSettings::default().verbosity),
            check: opts.dry_run,
            debug: opts.debug,
        }
    }
}

/// Where the extra variables for a run come from.
#[derive(Args, Debug, Clone, Default)]
pub struct VariableArgs {
    /// Path to oct.yaml (built-in defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override a variable field, e.g. `--set become_user=alice`
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Pass an extra variable through unchanged, e.g. `-e origin_ci_hosts=nodes`
    #[arg(short = 'e', long = "extra-var", value_name = "KEY=VALUE")]
    pub extra_vars: Vec<String>,
}

impl VariableArgs {
    /// Build the execution context: config file, then `--set`, then `-e`.
    pub fn build_context(&self, settings: AnsibleSettings) -> Result<ExecutionContext, String> {
        let config = match self.config {
            Some(ref path) => load_config(path)?,
            None => OctConfig {
                version: "1.0".to_string(),
                ..Default::default()
            },
        };

        let mut ctx = config::build_context(&config, settings)?;

        for arg in &self.set {
            let (field, value) = config::parse_assignment(arg)?;
            ctx.variables
                .set(&field, value)
                .map_err(|e| e.to_string())?;
        }

        for arg in &self.extra_vars {
            let (key, value) = config::parse_assignment(arg)?;
            ctx.playbook_variables.insert(key, value);
        }

        tracing::debug!(
            inventory = ?ctx.inventory,
            caller_vars = ctx.playbook_variables.len(),
            "execution context ready"
        );
        Ok(ctx)
    }
}

/// Parse and validate an oct.yaml, returning errors if invalid.
pub fn load_config(path: &Path) -> Result<OctConfig, String> {
    let config = config::parse_config_file(path)?;
    let errors = config::validate_config(&config);
    if errors.is_empty() {
        return Ok(config);
    }
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    Err(format!(
        "{} validation error(s) in {}: {}",
        errors.len(),
        path.display(),
        messages.join("; ")
    ))
}
