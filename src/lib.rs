//! oct: origin CI tooling for Ansible-driven host automation.
//!
//! Defaults the `origin_ci_*` extra variables every playbook run receives
//! and carries the Ansible verbosity, dry-run, and debug settings.

pub mod cli;
pub mod core;
pub mod logging;
pub mod transport;
