//! OCT-005: Ansible command-line construction.
//!
//! Turns an execution context into an `ansible-playbook` (or ad-hoc
//! `ansible`) invocation: inventory, verbosity, check mode, debug
//! environment, and the defaulted extra variables as one JSON argument.

use super::settings::ExecutionContext;
use super::variables::{ExtraVars, Field};
use serde_json::Value;
use std::fmt;
use std::path::Path;

pub const PLAYBOOK_BINARY: &str = "ansible-playbook";
pub const ADHOC_BINARY: &str = "ansible";

/// A program invocation, not yet executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.env {
            write!(f, "{}={} ", k, shell_quote(v))?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument for display when it contains shell metacharacters.
fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Render extra variables the way `--extra-vars` expects them.
pub fn render_extra_vars(vars: &ExtraVars) -> Result<String, String> {
    serde_json::to_string(vars).map_err(|e| format!("cannot encode extra vars: {}", e))
}

/// Flags shared by both invocation kinds.
fn common_args(ctx: &ExecutionContext, vars: &ExtraVars) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    if let Some(ref inventory) = ctx.inventory {
        args.push("-i".to_string());
        args.push(inventory.display().to_string());
    }
    if let Some(flag) = ctx.settings.verbosity_flag() {
        args.push(flag);
    }
    if ctx.settings.check {
        args.push("--check".to_string());
    }
    args.push("--extra-vars".to_string());
    args.push(render_extra_vars(vars)?);
    Ok(args)
}

fn debug_env(ctx: &ExecutionContext) -> Vec<(String, String)> {
    if ctx.settings.debug {
        vec![("ANSIBLE_DEBUG".to_string(), "1".to_string())]
    } else {
        Vec::new()
    }
}

/// `ansible-playbook` run of `playbook` with the context's extra variables.
pub fn build_playbook(ctx: &ExecutionContext, playbook: &Path) -> Result<Invocation, String> {
    let vars = ctx.extra_vars();
    let mut args = common_args(ctx, &vars)?;
    args.push(playbook.display().to_string());
    Ok(Invocation {
        program: PLAYBOOK_BINARY.to_string(),
        args,
        env: debug_env(ctx),
    })
}

/// Ad-hoc `ping` of the defaulted target host group.
pub fn build_ping(ctx: &ExecutionContext) -> Result<Invocation, String> {
    let vars = ctx.extra_vars();
    let key = Field::Hosts.variable_name();
    let hosts = match vars.get(&key) {
        Some(Value::String(h)) if !h.is_empty() => h.clone(),
        other => {
            return Err(format!(
                "{} must be a non-empty string to select hosts, got {}",
                key,
                other.unwrap_or(&Value::Null)
            ))
        }
    };

    let mut args = vec![hosts, "-m".to_string(), "ping".to_string()];
    args.extend(common_args(ctx, &vars)?);
    Ok(Invocation {
        program: ADHOC_BINARY.to_string(),
        args,
        env: debug_env(ctx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::AnsibleSettings;
    use serde_json::json;
    use std::path::PathBuf;

    fn extra_vars_arg(inv: &Invocation) -> ExtraVars {
        let pos = inv.args.iter().position(|a| a == "--extra-vars").unwrap();
        serde_json::from_str(&inv.args[pos + 1]).unwrap()
    }

    #[test]
    fn test_oct005_playbook_defaults() {
        let ctx = ExecutionContext::default();
        let inv = build_playbook(&ctx, Path::new("playbooks/provision.yml")).unwrap();
        assert_eq!(inv.program, "ansible-playbook");
        assert_eq!(inv.args[0], "-v");
        assert!(!inv.args.contains(&"--check".to_string()));
        assert_eq!(inv.args.last().unwrap(), "playbooks/provision.yml");
        assert!(inv.env.is_empty());

        let vars = extra_vars_arg(&inv);
        assert_eq!(vars["origin_ci_hosts"], json!("OSEv3"));
        assert_eq!(vars["origin_ci_become"], json!(true));
        assert_eq!(vars.len(), 7);
    }

    #[test]
    fn test_oct005_playbook_settings() {
        let ctx = ExecutionContext {
            settings: AnsibleSettings {
                verbosity: 3,
                check: true,
                debug: true,
            },
            inventory: Some(PathBuf::from("inventory/hosts")),
            ..Default::default()
        };
        let inv = build_playbook(&ctx, Path::new("site.yml")).unwrap();
        assert_eq!(&inv.args[..4], &["-i", "inventory/hosts", "-vvv", "--check"]);
        assert_eq!(inv.env, vec![("ANSIBLE_DEBUG".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_oct005_playbook_preserves_null_override() {
        let mut ctx = ExecutionContext::default();
        ctx.playbook_variables
            .insert("origin_ci_docker_volume_group".to_string(), Value::Null);
        let inv = build_playbook(&ctx, Path::new("site.yml")).unwrap();
        assert!(extra_vars_arg(&inv)["origin_ci_docker_volume_group"].is_null());
    }

    #[test]
    fn test_oct005_ping_targets_hosts() {
        let mut ctx = ExecutionContext::default();
        ctx.variables.set("hosts", json!("masters")).unwrap();
        let inv = build_ping(&ctx).unwrap();
        assert_eq!(inv.program, "ansible");
        assert_eq!(&inv.args[..3], &["masters", "-m", "ping"]);
    }

    #[test]
    fn test_oct005_ping_caller_hosts_win() {
        let mut ctx = ExecutionContext::default();
        ctx.playbook_variables
            .insert("origin_ci_hosts".to_string(), json!("nodes"));
        let inv = build_ping(&ctx).unwrap();
        assert_eq!(inv.args[0], "nodes");
    }

    #[test]
    fn test_oct005_ping_null_hosts() {
        let mut ctx = ExecutionContext::default();
        ctx.playbook_variables
            .insert("origin_ci_hosts".to_string(), Value::Null);
        let err = build_ping(&ctx).unwrap_err();
        assert!(err.contains("origin_ci_hosts"));
    }

    #[test]
    fn test_oct005_display_quotes() {
        let inv = Invocation {
            program: "ansible-playbook".to_string(),
            args: vec!["-v".to_string(), r#"{"a":"it's"}"#.to_string()],
            env: vec![("ANSIBLE_DEBUG".to_string(), "1".to_string())],
        };
        assert_eq!(
            inv.to_string(),
            r#"ANSIBLE_DEBUG=1 ansible-playbook -v '{"a":"it'\''s"}'"#
        );
    }

    #[test]
    fn test_oct005_render_extra_vars_order() {
        let vars = ExecutionContext::default().extra_vars();
        let rendered = render_extra_vars(&vars).unwrap();
        let head = r#"{"origin_ci_hosts":"OSEv3","origin_ci_connection":"ssh""#;
        assert!(rendered.starts_with(head));
    }
}
