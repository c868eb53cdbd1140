use crate::error::CacheError;
use std::io::ErrorKind;
use std::process::Command;

/// Flags every query shares: no header row, raw byte units, `|`-separated fields.
pub const BASE_ARGS: [&str; 6] = ["--noheadings", "--nosuffix", "--units", "b", "--separator", "|"];

/// Something that can answer an `lvs` query. The real implementation shells
/// out; tests feed canned output.
pub trait LvmQuery {
    /// Run `lvs` with `args` appended to [`BASE_ARGS`] and return stdout.
    fn lvs(&self, args: &[&str]) -> Result<String, CacheError>;
}

/// Runs the `lvs` binary, optionally through `sudo`.
#[derive(Debug, Clone)]
pub struct LvsCommand {
    sudo:            bool,
    non_interactive: bool,
}

impl LvsCommand {
    pub fn new(sudo: bool) -> Self {
        Self { sudo, non_interactive: false }
    }

    /// Never let `sudo` prompt for a password. Used once the dashboard owns the
    /// screen, where a prompt would be invisible and block forever.
    pub fn non_interactive(mut self) -> Self {
        self.non_interactive = true;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = if self.sudo {
            let mut c = Command::new("sudo");
            if self.non_interactive { c.arg("-n"); }
            c.arg("lvs");
            c
        } else {
            Command::new("lvs")
        };
        cmd.env("LC_ALL", "C").args(BASE_ARGS);
        cmd
    }
}

impl LvmQuery for LvsCommand {
    fn lvs(&self, args: &[&str]) -> Result<String, CacheError> {
        let out = self.command()
            .args(args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CacheError::Discovery(
                    format!("{} not found (is lvm2 installed?)", if self.sudo { "sudo" } else { "lvs" })),
                ErrorKind::PermissionDenied => CacheError::Permission(e.to_string()),
                _ => CacheError::Discovery(format!("cannot run lvs: {}", e)),
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(classify_failure(&stderr));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

/// Map a failed `lvs` run to an error class from its stderr.
pub fn classify_failure(stderr: &str) -> CacheError {
    const DENIED: [&str; 5] = [
        "Permission denied",
        "Operation not permitted",
        "must be root",
        "a password is required",
        "not in the sudoers",
    ];
    // lvs prefixes most failures with a non-root WARNING line; report the real cause.
    let message = stderr.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .find(|l| !l.starts_with("WARNING"))
        .or_else(|| stderr.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or("no output")
        .to_string();

    if DENIED.iter().any(|d| stderr.contains(d)) {
        CacheError::Permission(message)
    } else {
        CacheError::Query(message)
    }
}

/// Split one `|`-separated record into trimmed fields.
pub fn split_record(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays queued responses in order and records every argument list.
    #[derive(Default)]
    pub struct CannedLvs {
        responses: RefCell<VecDeque<Result<String, CacheError>>>,
        pub calls: RefCell<Vec<Vec<String>>>,
    }

    impl CannedLvs {
        pub fn new() -> Self { Self::default() }

        pub fn ok(self, stdout: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(stdout.to_string()));
            self
        }

        pub fn err(self, e: CacheError) -> Self {
            self.responses.borrow_mut().push_back(Err(e));
            self
        }
    }

    impl LvmQuery for CannedLvs {
        fn lvs(&self, args: &[&str]) -> Result<String, CacheError> {
            self.calls.borrow_mut().push(args.iter().map(|s| s.to_string()).collect());
            self.responses.borrow_mut().pop_front()
                .unwrap_or_else(|| Err(CacheError::Query("no canned response left".into())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_failures_are_recognised() {
        let stderr = "  WARNING: Running as a non-root user. Functionality may be unavailable.\n  \
                      /run/lock/lvm/P_global:aux: open failed: Permission denied\n";
        match classify_failure(stderr) {
            CacheError::Permission(msg) => assert!(msg.contains("open failed")),
            other => panic!("expected permission error, got {:?}", other),
        }
        assert!(matches!(classify_failure("sudo: a password is required\n"), CacheError::Permission(_)));
    }

    #[test]
    fn other_failures_are_query_errors() {
        match classify_failure("  Failed to find logical volume \"vg0/nope\"\n") {
            CacheError::Query(msg) => assert_eq!(msg, "Failed to find logical volume \"vg0/nope\""),
            other => panic!("expected query error, got {:?}", other),
        }
    }

    #[test]
    fn records_are_trimmed() {
        assert_eq!(split_record("  vg0|data |writeback|65536"), vec!["vg0", "data", "writeback", "65536"]);
    }

    #[test]
    fn sudo_wraps_lvs() {
        let cmd = LvsCommand::new(true).non_interactive().command();
        assert_eq!(cmd.get_program(), "sudo");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(&args[..3], &["-n", "lvs", "--noheadings"]);

        let plain = LvsCommand::new(false).command();
        assert_eq!(plain.get_program(), "lvs");
    }
}
