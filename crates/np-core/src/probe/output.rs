//! Plugin output parsing and result classification.
//!
//! Plugins print `message | key=value;warn;crit ...` lines. Text before the
//! first `|` of each line is log output, the rest is performance data.

use std::collections::BTreeMap;
use std::fmt;

use super::executor::KILLED_EXIT_CODE;

/// Message reported when the deadline killed the plugin.
pub const TIMED_OUT_MESSAGE: &str = "The process timed out";

/// Result kind following the plugin exit code convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultKind {
    Ok = 0,
    Warning = 1,
    Error = 2,
    Unknown = 3,
}

impl ResultKind {
    /// Numeric code published as the metric value.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Kind for a documented plugin exit code.
    pub fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ResultKind::Ok),
            1 => Some(ResultKind::Warning),
            2 => Some(ResultKind::Error),
            3 => Some(ResultKind::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::Ok => "OK",
            ResultKind::Warning => "WARNING",
            ResultKind::Error => "ERROR",
            ResultKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// The outcome of one probe invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub kind: ResultKind,
    pub message: String,
    pub perf_data: BTreeMap<String, f64>,
}

impl CheckResult {
    /// A result without performance data.
    pub fn new(kind: ResultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            perf_data: BTreeMap::new(),
        }
    }

    /// Classify a finished plugin run from its exit code and combined output.
    pub fn from_exit(exit_code: i32, output: &str) -> Self {
        if exit_code == KILLED_EXIT_CODE {
            return Self::new(ResultKind::Error, TIMED_OUT_MESSAGE);
        }

        match ResultKind::from_exit_code(exit_code) {
            Some(kind) => {
                let parsed = PluginOutput::parse(output);
                Self {
                    kind,
                    message: parsed.message().to_string(),
                    perf_data: parsed.perf_data(),
                }
            }
            None => Self::new(
                ResultKind::Unknown,
                format!("An unexpected exit code was returned: {exit_code}"),
            ),
        }
    }
}

/// Plugin output split into log and performance data segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginOutput {
    pub log: Vec<String>,
    pub perf: Vec<String>,
}

impl PluginOutput {
    /// Split raw output. Blank lines are dropped.
    pub fn parse(output: &str) -> Self {
        let mut parsed = Self::default();

        for line in output.split('\n').filter(|l| !l.trim().is_empty()) {
            let mut segments = line.split('|');
            if let Some(log) = segments.next() {
                parsed.log.push(log.trim().to_string());
            }
            parsed
                .perf
                .extend(segments.map(|s| s.trim().to_string()));
        }

        parsed
    }

    /// First log entry, or empty.
    pub fn message(&self) -> &str {
        self.log.first().map(String::as_str).unwrap_or_default()
    }

    /// Numeric performance values keyed by label.
    pub fn perf_data(&self) -> BTreeMap<String, f64> {
        parse_perf_data(self.perf.iter().map(String::as_str))
    }
}

/// Parse `key=value[;warn;crit;min;max]` tokens.
///
/// Only the value field is kept. Units and other non-numeric characters are
/// stripped; tokens that still fail to parse are skipped and a later
/// duplicate key overwrites an earlier one.
pub fn parse_perf_data<'a>(segments: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, f64> {
    let mut values = BTreeMap::new();

    for token in segments.into_iter().flat_map(str::split_whitespace) {
        let mut parts = token.splitn(2, '=');
        let (Some(key), Some(raw)) = (parts.next(), parts.next()) else {
            continue;
        };
        let field = raw.split(';').next().unwrap_or_default();
        let numeric: String = field
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(value) = numeric.parse::<f64>() {
            values.insert(key.to_string(), value);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_and_perfdata() {
        let result = CheckResult::from_exit(0, "All good | time=120ms;500;1000 load=3.2\n");
        assert_eq!(result.kind, ResultKind::Ok);
        assert_eq!(result.message, "All good");
        assert_eq!(result.perf_data.len(), 2);
        assert_eq!(result.perf_data["time"], 120.0);
        assert_eq!(result.perf_data["load"], 3.2);
    }

    #[test]
    fn test_multiline_output() {
        let output = "DISK OK - free space\n\n/ 3326 MB (56%); | /=2643MB;5948;5958;0;5968\n/boot 68 MB (69%);\n| /boot=68MB;88;93;0;98 /home=69357MB;253404;253409;0;253414\n";
        let parsed = PluginOutput::parse(output);
        assert_eq!(parsed.message(), "DISK OK - free space");
        assert_eq!(parsed.log.len(), 4);
        assert_eq!(parsed.log[3], "");

        let perf = parsed.perf_data();
        assert_eq!(perf["/"], 2643.0);
        assert_eq!(perf["/boot"], 68.0);
        assert_eq!(perf["/home"], 69357.0);
    }

    #[test]
    fn test_empty_output() {
        let result = CheckResult::from_exit(1, "");
        assert_eq!(result.kind, ResultKind::Warning);
        assert_eq!(result.message, "");
        assert!(result.perf_data.is_empty());
    }

    #[test]
    fn test_invalid_tokens_skipped() {
        let perf = parse_perf_data(["novalue junk= ratio=abc ok=5 =7"]);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf["ok"], 5.0);
        assert_eq!(perf[""], 7.0);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let perf = parse_perf_data(["a=1", "a=2;3"]);
        assert_eq!(perf["a"], 2.0);
    }

    #[test]
    fn test_sign_is_stripped() {
        // Only digits and dots survive.
        let perf = parse_perf_data(["offset=-0.5s"]);
        assert_eq!(perf["offset"], 0.5);
    }

    #[test]
    fn test_error_exit_code() {
        let result = CheckResult::from_exit(2, "CRITICAL - down | rtt=0");
        assert_eq!(result.kind, ResultKind::Error);
        assert_eq!(result.message, "CRITICAL - down");
        assert_eq!(result.perf_data["rtt"], 0.0);
    }

    #[test]
    fn test_unknown_exit_code() {
        let result = CheckResult::from_exit(3, "UNKNOWN - bad args");
        assert_eq!(result.kind, ResultKind::Unknown);
        assert_eq!(result.message, "UNKNOWN - bad args");
    }

    #[test]
    fn test_unexpected_exit_code() {
        let result = CheckResult::from_exit(7, "whatever | x=1");
        assert_eq!(result.kind, ResultKind::Unknown);
        assert_eq!(result.message, "An unexpected exit code was returned: 7");
        assert!(result.perf_data.is_empty());
    }

    #[test]
    fn test_timed_out() {
        let result = CheckResult::from_exit(KILLED_EXIT_CODE, "partial | t=1");
        assert_eq!(result.kind, ResultKind::Error);
        assert_eq!(result.message, "The process timed out");
        assert!(result.perf_data.is_empty());
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(ResultKind::Ok.code(), 0);
        assert_eq!(ResultKind::Warning.code(), 1);
        assert_eq!(ResultKind::Error.code(), 2);
        assert_eq!(ResultKind::Unknown.code(), 3);
        assert_eq!(ResultKind::from_exit_code(4), None);
        assert_eq!(ResultKind::Warning.to_string(), "WARNING");
    }
}
