//! Masking of credential-bearing arguments.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::flag::FlagToken;

/// Replacement written in place of a sensitive value.
pub const MASK: &str = "*****";

/// Flag names whose values never reach the logs.
pub const SENSITIVE_FLAGS: &[&str] = &["user", "username", "login", "pass", "password", "pwd"];

static DEFAULT_OBFUSCATOR: Lazy<ArgumentObfuscator> = Lazy::new(ArgumentObfuscator::default);

/// Obfuscate an argument vector with the default flag set.
pub fn obfuscate_arguments(args: &[String]) -> Vec<String> {
    DEFAULT_OBFUSCATOR.obfuscate(args)
}

/// Produces log-safe copies of plugin argument vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentObfuscator {
    /// Lower-cased sensitive flag names.
    names: HashSet<String>,
    /// Replacement text.
    mask: String,
}

impl Default for ArgumentObfuscator {
    fn default() -> Self {
        Self {
            names: SENSITIVE_FLAGS.iter().map(|s| s.to_string()).collect(),
            mask: MASK.to_string(),
        }
    }
}

impl ArgumentObfuscator {
    /// Create an obfuscator with no sensitive names (logs arguments verbatim).
    pub fn disabled() -> Self {
        Self {
            names: HashSet::new(),
            mask: MASK.to_string(),
        }
    }

    /// Add further sensitive flag names.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names
            .extend(names.into_iter().map(|n| n.as_ref().to_lowercase()));
        self
    }

    /// Whether a flag name is considered sensitive (case-insensitive).
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Return a copy of `args` with sensitive values masked.
    ///
    /// Inline values (`-pass=x`, `-pass:x`, `-pass x`) are masked in place;
    /// a bare sensitive flag masks the argument that follows it. The result
    /// always has the same length as the input.
    pub fn obfuscate(&self, args: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(args.len());
        let mut mask_next = false;

        for arg in args {
            if mask_next {
                out.push(self.mask.clone());
                mask_next = false;
                continue;
            }

            match FlagToken::parse(arg) {
                Some(flag) if self.is_sensitive(flag.name) => {
                    if flag.has_inline_value() {
                        out.push(flag.with_value(&self.mask));
                    } else {
                        out.push(arg.clone());
                        mask_next = true;
                    }
                }
                _ => out.push(arg.clone()),
            }
        }

        out
    }

    /// Obfuscate and join into a single line for logging.
    pub fn render(&self, args: &[String]) -> String {
        self.obfuscate(args).join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_masks_separate_values() {
        let args = strings(&["-target", "reva:19000", "-user", "alice", "-pass", "hunter2"]);
        let logged = obfuscate_arguments(&args);
        assert_eq!(
            logged,
            strings(&["-target", "reva:19000", "-user", MASK, "-pass", MASK])
        );
    }

    #[test]
    fn test_masks_inline_values() {
        let args = strings(&["--password=abc", "-LOGIN:bob", "-pwd x y"]);
        let logged = obfuscate_arguments(&args);
        assert_eq!(logged, strings(&["--password=*****", "-LOGIN:*****", "-pwd *****"]));
    }

    #[test]
    fn test_non_sensitive_untouched() {
        let args = strings(&["-H", "example.org", "--passive", "-u", "x"]);
        assert_eq!(obfuscate_arguments(&args), args);
    }

    #[test]
    fn test_trailing_bare_flag() {
        let args = strings(&["-host", "h", "-user"]);
        assert_eq!(obfuscate_arguments(&args), args);
    }

    #[test]
    fn test_input_is_not_modified() {
        let args = strings(&["-pass", "secret"]);
        let _ = obfuscate_arguments(&args);
        assert_eq!(args[1], "secret");
    }

    #[test]
    fn test_custom_names() {
        let obfuscator = ArgumentObfuscator::default().with_names(["Token"]);
        assert!(obfuscator.is_sensitive("token"));
        let args = strings(&["--token", "abc"]);
        assert_eq!(obfuscator.obfuscate(&args), strings(&["--token", MASK]));
    }

    #[test]
    fn test_disabled() {
        let args = strings(&["-pass", "secret"]);
        assert_eq!(ArgumentObfuscator::disabled().obfuscate(&args), args);
    }

    #[test]
    fn test_render() {
        let args = strings(&["-user", "alice", "-v"]);
        assert_eq!(ArgumentObfuscator::default().render(&args), "-user ***** -v");
    }
}
