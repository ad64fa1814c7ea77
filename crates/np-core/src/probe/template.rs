//! Argument template expansion.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::placeholders::Placeholders;

/// `$name$` with no whitespace and no inner `$`.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[^\s$]*\$").expect("placeholder regex is valid"));

/// Split `-flag value` entries at the first space.
///
/// Entries not starting with `-` or without a space pass through unchanged.
pub fn split_arguments<S: AsRef<str>>(arguments: &[S]) -> Vec<String> {
    let mut split = Vec::with_capacity(arguments.len());
    for argument in arguments {
        let argument = argument.as_ref();
        match argument.split_once(' ') {
            Some((flag, value)) if argument.starts_with('-') => {
                split.push(flag.to_string());
                split.push(value.to_string());
            }
            _ => split.push(argument.to_string()),
        }
    }
    split
}

/// Replace every known `$name$` token in `argument`.
///
/// Unknown tokens are left exactly as written.
pub fn substitute(argument: &str, placeholders: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(argument, |caps: &Captures<'_>| {
            let token = &caps[0];
            let name = &token[1..token.len() - 1];
            placeholders
                .get(name)
                .map(str::to_string)
                .unwrap_or_else(|| token.to_string())
        })
        .into_owned()
}

/// Split then substitute a full argument template.
pub fn expand_arguments<S: AsRef<str>>(
    arguments: &[S],
    placeholders: &Placeholders,
) -> Vec<String> {
    split_arguments(arguments)
        .iter()
        .map(|argument| substitute(argument, placeholders))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders() -> Placeholders {
        let mut p = Placeholders::from_params([("Site", "CERN")]);
        p.add_target("https://reva.example.org:443/dav");
        p.insert("testclient_id", "alice");
        p
    }

    #[test]
    fn test_split_flag_with_value() {
        let args = split_arguments(&["-H $target_host$", "--url=x", "plain arg", "-v"]);
        assert_eq!(args, vec!["-H", "$target_host$", "--url=x", "plain arg", "-v"]);
    }

    #[test]
    fn test_split_only_first_space() {
        let args = split_arguments(&["-s a b c"]);
        assert_eq!(args, vec!["-s", "a b c"]);
    }

    #[test]
    fn test_substitute_known() {
        let p = placeholders();
        assert_eq!(substitute("$SITE$", &p), "CERN");
        assert_eq!(substitute("user=$testclient_id$", &p), "user=alice");
        assert_eq!(substitute("$target_path$", &p), "/dav");
    }

    #[test]
    fn test_substitute_unknown_left_verbatim() {
        let p = placeholders();
        assert_eq!(substitute("$nope$", &p), "$nope$");
        assert_eq!(substitute("cost $5", &p), "cost $5");
        assert_eq!(substitute("$$", &p), "$$");
    }

    #[test]
    fn test_adjacent_tokens() {
        let p = placeholders();
        assert_eq!(substitute("$site$$testclient_id$", &p), "CERNalice");
    }

    #[test]
    fn test_expand_full_template() {
        let p = placeholders();
        let args = expand_arguments(
            &["-H $target_host$", "-u", "$target_path$", "--site=$site$"],
            &p,
        );
        assert_eq!(
            args,
            vec!["-H", "reva.example.org:443", "-u", "/dav", "--site=CERN"]
        );
    }

    #[test]
    fn test_identity_without_placeholders() {
        let template = ["-v", "--timeout=10", "host"];
        assert_eq!(expand_arguments(&template, &Placeholders::new()), template);
    }
}
