//! OCT-006: Process transport for Ansible invocations.

pub mod local;

/// Output from running an invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oct006_exec_output_success() {
        let ok = ExecOutput {
            exit_code: 0,
            stdout: "ok".into(),
            stderr: "".into(),
        };
        assert!(ok.success());
        let fail = ExecOutput {
            exit_code: 2,
            stdout: "".into(),
            stderr: "unreachable".into(),
        };
        assert!(!fail.success());
        let sig = ExecOutput {
            exit_code: -1,
            stdout: "".into(),
            stderr: "".into(),
        };
        assert!(!sig.success());
    }
}
