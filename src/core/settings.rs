//! OCT-003: Ansible output settings and the per-invocation execution context.

use super::variables::{ExtraVars, PlaybookExtraVariables};
use std::path::PathBuf;

/// Output controls for the downstream Ansible run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsibleSettings {
    /// Ansible verbosity level (number of `-v` passed through)
    pub verbosity: u8,
    /// Run in check (dry-run) mode
    pub check: bool,
    /// Run with Ansible debug output enabled
    pub debug: bool,
}

impl Default for AnsibleSettings {
    fn default() -> Self {
        Self {
            verbosity: 1,
            check: false,
            debug: false,
        }
    }
}

impl AnsibleSettings {
    /// Verbosity flag as passed to `ansible-playbook` (`-v`, `-vv`, …).
    /// Returns `None` at level zero.
    pub fn verbosity_flag(&self) -> Option<String> {
        if self.verbosity == 0 {
            return None;
        }
        Some(format!("-{}", "v".repeat(usize::from(self.verbosity))))
    }
}

/// Everything an automation subcommand needs, built once after parsing.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub settings: AnsibleSettings,
    pub variables: PlaybookExtraVariables,
    /// Caller-supplied extra variables; defaults are filled around these
    pub playbook_variables: ExtraVars,
    pub inventory: Option<PathBuf>,
}

impl ExecutionContext {
    /// The fully-defaulted extra-variable mapping for this run.
    pub fn extra_vars(&self) -> ExtraVars {
        self.variables.apply_defaults(&self.playbook_variables)
    }
}
