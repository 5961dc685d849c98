//! Core logic: variable defaulting, settings, config parsing, invocations.

pub mod config;
pub mod error;
pub mod playbook;
pub mod settings;
pub mod variables;
