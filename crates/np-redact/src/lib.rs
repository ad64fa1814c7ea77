//! Argument obfuscation for the Nagios probe.
//!
//! Plugin command lines routinely carry credentials (`-user`, `-pass`, ...).
//! This crate produces a copy of an argument vector that is safe to write to
//! logs. The vector actually handed to the plugin is never touched.
//!
//! # Example
//!
//! ```
//! use np_redact::ArgumentObfuscator;
//!
//! let args = vec!["-user".to_string(), "alice".to_string(), "--pass=hunter2".to_string()];
//! let logged = ArgumentObfuscator::default().obfuscate(&args);
//! assert_eq!(logged, vec!["-user", "*****", "--pass=*****"]);
//! ```

pub mod flag;
pub mod obfuscate;

pub use flag::FlagToken;
pub use obfuscate::{obfuscate_arguments, ArgumentObfuscator, MASK, SENSITIVE_FLAGS};
