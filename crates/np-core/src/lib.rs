//! Nagios Probe Core Library
//!
//! This library runs Nagios-compatible plugin binaries as probes:
//! - Check binary resolution
//! - Argument templating with per-request placeholders
//! - Deadline-bound subprocess execution
//! - Plugin output parsing and result classification
//! - Prometheus metric publication
//!
//! The binary entry point is in `main.rs`.

pub mod exit_codes;
pub mod logging;
pub mod probe;

pub use probe::{
    verdict, CheckResult, Deadline, NagiosProber, ProbeRequest, PublishError, ResultKind,
};
