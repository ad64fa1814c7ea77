//! Exit codes for the np-core CLI.
//!
//! Exit code ranges:
//! - 0-1: probe outcome
//! - 10-19: user/environment errors (recoverable by user action)
//! - 20-29: internal errors

/// Exit codes for np-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Probe succeeded, or command completed.
    Success = 0,

    /// Probe ran and its verdict is failure.
    ProbeFailed = 1,

    /// Invalid arguments (unknown module, malformed parameter)
    ArgsError = 10,

    /// Configuration missing, unreadable or invalid
    ConfigError = 11,

    /// Internal error (metric registration or encoding)
    InternalError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable name for machine-readable output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::ProbeFailed => "PROBE_FAILED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::ProbeFailed.as_i32(), 1);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ConfigError.as_i32(), 11);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
    }

    #[test]
    fn test_code_names() {
        assert_eq!(ExitCode::Success.code_name(), "OK");
        assert_eq!(ExitCode::ProbeFailed.code_name(), "PROBE_FAILED");
        assert_eq!(ExitCode::ArgsError.code_name(), "ERR_ARGS");
        assert_eq!(ExitCode::ConfigError.code_name(), "ERR_CONFIG");
        assert_eq!(ExitCode::InternalError.code_name(), "ERR_INTERNAL");
    }
}
