//! Fuzz target for plugin output classification.
//!
//! Plugin output is arbitrary text from third-party binaries; parsing must
//! never panic whatever the exit code.

#![no_main]

use libfuzzer_sys::fuzz_target;
use np_core::probe::{CheckResult, ResultKind};

fuzz_target!(|input: (i32, &str)| {
    let (exit_code, output) = input;
    let result = CheckResult::from_exit(exit_code, output);

    if !(0..=3).contains(&exit_code) {
        assert!(result.perf_data.is_empty());
        assert_ne!(result.kind, ResultKind::Ok);
    }
    assert!(result.perf_data.values().all(|v| *v >= 0.0));
});
