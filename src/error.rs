use thiserror::Error;

/// Everything that can go wrong between the volume manager and the screen.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No candidate volumes, or `lvs` could not be run at all.
    #[error("volume discovery failed: {0}")]
    Discovery(String),

    /// `lvs` refused to answer for lack of privilege.
    #[error("permission denied querying LVM: {0}")]
    Permission(String),

    /// `lvs` answered but the record was malformed or inconsistent.
    #[error("unexpected lvs output: {0}")]
    Parse(String),

    /// `lvs` ran and failed for some other reason (unknown volume, locking, ...).
    #[error("lvs failed: {0}")]
    Query(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl CacheError {
    /// Process exit code when this error ends the program at startup.
    /// Every startup failure is reported the same way; 0 is reserved for a clean quit.
    pub fn exit_code(&self) -> u8 { 1 }

    /// Errors that stop the program when they happen before the dashboard starts.
    pub fn fatal_at_startup(&self) -> bool {
        matches!(self, CacheError::Discovery(_) | CacheError::Permission(_))
    }

    /// Short heading used by the inline diagnostic.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Discovery(_)  => "Discovery error",
            CacheError::Permission(_) => "Permission denied",
            CacheError::Parse(_)      => "Parse error",
            CacheError::Query(_)      => "Query failed",
            CacheError::Terminal(_)   => "Terminal error",
        }
    }

    /// Operator hint shown under the inline diagnostic.
    pub fn hint(&self) -> &'static str {
        match self {
            CacheError::Permission(_) =>
                "Run as root, or set [lvm] sudo = \"always\" in cachetop.toml. Retrying each interval.",
            CacheError::Discovery(_) =>
                "Make sure lvm2 is installed and a cache is attached (lvconvert --type cache).",
            _ => "Retrying on the next interval.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_failures_exit_with_one() {
        assert_eq!(CacheError::Discovery("none".into()).exit_code(), 1);
        assert_eq!(CacheError::Permission("denied".into()).exit_code(), 1);
        assert_ne!(CacheError::Parse("bad".into()).exit_code(), 0);
    }

    #[test]
    fn parse_errors_do_not_block_startup() {
        assert!(CacheError::Permission("x".into()).fatal_at_startup());
        assert!(CacheError::Discovery("x".into()).fatal_at_startup());
        assert!(!CacheError::Parse("x".into()).fatal_at_startup());
        assert!(!CacheError::Query("x".into()).fatal_at_startup());
    }

    #[test]
    fn io_errors_become_terminal_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let e: CacheError = io.into();
        assert_eq!(e.kind(), "Terminal error");
        assert_eq!(e.to_string(), "terminal error: gone");
    }
}
