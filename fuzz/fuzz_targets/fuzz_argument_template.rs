//! Fuzz target for argument templating and obfuscation.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use np_core::probe::{expand_arguments, Placeholders};
use np_redact::obfuscate_arguments;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    target: &'a str,
    params: Vec<(&'a str, &'a str)>,
    arguments: Vec<String>,
}

fuzz_target!(|input: Input<'_>| {
    let mut placeholders = Placeholders::from_params(input.params.iter().map(|(k, v)| (*k, *v)));
    placeholders.add_target(input.target);

    let expanded = expand_arguments(&input.arguments, &placeholders);
    assert!(expanded.len() >= input.arguments.len());
    assert!(expanded.len() <= input.arguments.len() * 2);

    let logged = obfuscate_arguments(&expanded);
    assert_eq!(logged.len(), expanded.len());
});
