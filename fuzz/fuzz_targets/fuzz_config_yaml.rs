//! Fuzz target for prober.yml loading and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use np_config::validate::validate_prober_config;
use np_config::ProberConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = ProberConfig::parse_yaml(s) {
            let _ = validate_prober_config(&config);
        }
    }
});
