//! Property-based tests for argument obfuscation invariants.

use np_redact::{obfuscate_arguments, ArgumentObfuscator, MASK, SENSITIVE_FLAGS};
use proptest::prelude::*;

fn arb_arg() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9./:]{1,12}",
        "-{1,2}[a-z]{1,8}",
        "-{1,2}[a-z]{1,8}[=:][a-z0-9]{0,8}",
        prop::sample::select(SENSITIVE_FLAGS).prop_map(|n| format!("-{n}")),
        prop::sample::select(SENSITIVE_FLAGS).prop_map(|n| format!("--{}=secret", n.to_uppercase())),
    ]
}

proptest! {
    #[test]
    fn obfuscation_preserves_length(args in prop::collection::vec(arb_arg(), 0..12)) {
        let logged = obfuscate_arguments(&args);
        prop_assert_eq!(logged.len(), args.len());
    }

    #[test]
    fn obfuscation_only_touches_sensitive_positions(args in prop::collection::vec(arb_arg(), 0..12)) {
        let obfuscator = ArgumentObfuscator::default();
        let logged = obfuscator.obfuscate(&args);

        for (idx, (orig, shown)) in args.iter().zip(&logged).enumerate() {
            if orig == shown {
                continue;
            }
            // A changed argument is either an inline-value flag or follows a bare flag.
            let inline = np_redact::FlagToken::parse(orig)
                .map(|f| obfuscator.is_sensitive(f.name) && f.has_inline_value())
                .unwrap_or(false);
            let after_flag = idx > 0 && shown == MASK;
            prop_assert!(inline || after_flag, "unexpected change at {}: {} -> {}", idx, orig, shown);
        }
    }

    #[test]
    fn sensitive_value_is_masked(name in prop::sample::select(SENSITIVE_FLAGS), value in "[a-zA-Z0-9]{1,16}", upper in any::<bool>()) {
        let flag = if upper { format!("-{}", name.to_uppercase()) } else { format!("-{name}") };
        let args = vec![flag.clone(), value.clone()];
        let logged = obfuscate_arguments(&args);
        prop_assert_eq!(&logged[0], &flag);
        prop_assert_eq!(logged[1].as_str(), MASK);
        prop_assert_eq!(&args[1], &value);
    }
}
