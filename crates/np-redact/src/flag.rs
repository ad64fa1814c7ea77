//! Command-line flag tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

// `-name`, `--name=value`, `-name:value`, `-name value`
static FLAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(-+)([^\s:=-][^\s:=]*)(?:([\s:=])(.*))?$").unwrap());

/// A command-line argument recognised as a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagToken<'a> {
    /// Leading dashes (`-` or `--`).
    pub dashes: &'a str,
    /// Flag name without dashes or delimiter.
    pub name: &'a str,
    /// Delimiter separating an inline value, if any.
    pub delimiter: Option<char>,
    /// Inline value following the delimiter.
    pub value: Option<&'a str>,
}

impl<'a> FlagToken<'a> {
    /// Parse an argument as a flag. Returns `None` for positional arguments.
    pub fn parse(arg: &'a str) -> Option<Self> {
        let caps = FLAG_PATTERN.captures(arg)?;
        let dashes = caps.get(1)?.as_str();
        let name = caps.get(2)?.as_str();
        let delimiter = caps.get(3).and_then(|m| m.as_str().chars().next());
        let value = caps.get(4).map(|m| m.as_str());

        Some(Self {
            dashes,
            name,
            delimiter,
            value,
        })
    }

    /// Whether the flag carries its value inline.
    pub fn has_inline_value(&self) -> bool {
        self.delimiter.is_some()
    }

    /// Render the flag with its inline value replaced.
    pub fn with_value(&self, value: &str) -> String {
        match self.delimiter {
            Some(delim) => format!("{}{}{}{}", self.dashes, self.name, delim, value),
            None => format!("{}{}", self.dashes, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_flag() {
        let flag = FlagToken::parse("--user").unwrap();
        assert_eq!(flag.dashes, "--");
        assert_eq!(flag.name, "user");
        assert!(!flag.has_inline_value());
        assert_eq!(flag.value, None);
    }

    #[test]
    fn test_parse_inline_values() {
        let eq = FlagToken::parse("-pass=secret").unwrap();
        assert_eq!(eq.name, "pass");
        assert_eq!(eq.delimiter, Some('='));
        assert_eq!(eq.value, Some("secret"));

        let colon = FlagToken::parse("-login:bob").unwrap();
        assert_eq!(colon.name, "login");
        assert_eq!(colon.delimiter, Some(':'));

        let space = FlagToken::parse("-pwd my secret").unwrap();
        assert_eq!(space.name, "pwd");
        assert_eq!(space.delimiter, Some(' '));
        assert_eq!(space.value, Some("my secret"));
    }

    #[test]
    fn test_parse_positional() {
        assert!(FlagToken::parse("alice").is_none());
        assert!(FlagToken::parse("").is_none());
        assert!(FlagToken::parse("--").is_none());
        assert!(FlagToken::parse("-=x").is_none());
    }

    #[test]
    fn test_with_value() {
        let flag = FlagToken::parse("--password=abc").unwrap();
        assert_eq!(flag.with_value("*****"), "--password=*****");
    }
}
