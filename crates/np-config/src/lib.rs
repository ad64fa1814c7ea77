//! Nagios probe configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the prober modules file (`prober.yml`)
//! - The site accounts service settings consumed by the credential broker
//! - Config resolution (CLI → env → XDG → /etc)
//! - Semantic validation

pub mod module;
pub mod prober;
pub mod resolve;
pub mod siteacc;
pub mod validate;

pub use module::{CheckModule, Module, ProberKind, DEFAULT_PROBE_TIMEOUT_MS};
pub use prober::ProberConfig;
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use siteacc::{SiteAccountsAuth, SiteAccountsConfig, SiteAccountsSecurity};
pub use validate::{ValidationError, ValidationResult};
