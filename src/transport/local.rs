//! OCT-006: Local execution of an invocation as a child process.

use super::ExecOutput;
use crate::core::playbook::Invocation;
use std::process::{Command, Stdio};

/// Run `invocation` to completion and capture its output.
/// A child killed by a signal reports exit code -1.
pub fn exec_local(invocation: &Invocation) -> Result<ExecOutput, String> {
    tracing::debug!(program = %invocation.program, args = invocation.args.len(), "spawning");

    let output = Command::new(&invocation.program)
        .args(&invocation.args)
        .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| format!("failed to spawn {}: {}", invocation.program, e))?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run `invocation` with the parent's stdio so output streams as it is
/// produced. Returns the exit code, -1 when killed by a signal.
pub fn exec_local_streaming(invocation: &Invocation) -> Result<i32, String> {
    tracing::debug!(program = %invocation.program, args = invocation.args.len(), "spawning");

    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .status()
        .map_err(|e| format!("failed to spawn {}: {}", invocation.program, e))?;

    Ok(status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            env: Vec::new(),
        }
    }

    #[test]
    fn test_oct006_local_echo() {
        let out = exec_local(&sh("echo hello")).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_oct006_local_failure() {
        let out = exec_local(&sh("exit 4")).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, 4);
    }

    #[test]
    fn test_oct006_local_stderr() {
        let out = exec_local(&sh("echo err >&2")).unwrap();
        assert!(out.success());
        assert!(out.stderr.contains("err"));
    }

    #[test]
    fn test_oct006_local_env() {
        let mut inv = sh("echo $ANSIBLE_DEBUG");
        inv.env.push(("ANSIBLE_DEBUG".to_string(), "1".to_string()));
        let out = exec_local(&inv).unwrap();
        assert_eq!(out.stdout.trim(), "1");
    }

    #[test]
    fn test_oct006_local_signal_killed() {
        let out = exec_local(&sh("kill -9 $$")).unwrap();
        assert_eq!(out.exit_code, -1);
    }

    #[test]
    fn test_oct006_streaming_exit_code() {
        assert_eq!(exec_local_streaming(&sh("exit 0")).unwrap(), 0);
        assert_eq!(exec_local_streaming(&sh("exit 3")).unwrap(), 3);
        assert_eq!(exec_local_streaming(&sh("kill -9 $$")).unwrap(), -1);
    }

    #[test]
    fn test_oct006_streaming_env() {
        let mut inv = sh("test \"$ANSIBLE_DEBUG\" = 1");
        inv.env.push(("ANSIBLE_DEBUG".to_string(), "1".to_string()));
        assert_eq!(exec_local_streaming(&inv).unwrap(), 0);
    }

    #[test]
    fn test_oct006_streaming_missing_program() {
        let inv = Invocation {
            program: "oct-no-such-binary".to_string(),
            args: Vec::new(),
            env: Vec::new(),
        };
        assert!(exec_local_streaming(&inv).is_err());
    }

    #[test]
    fn test_oct006_local_missing_program() {
        let inv = Invocation {
            program: "oct-no-such-binary".to_string(),
            args: Vec::new(),
            env: Vec::new(),
        };
        let err = exec_local(&inv).unwrap_err();
        assert!(err.contains("failed to spawn oct-no-such-binary"));
    }
}
