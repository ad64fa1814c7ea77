//! Per-invocation placeholder values.

use std::collections::HashMap;

use url::{ParseError, Url};

/// Placeholder name carrying the site whose credentials are injected.
pub const SITE_PARAM: &str = "site";

/// Case-insensitive map of `$name$` placeholder values.
///
/// Built fresh for every probe; keys are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: HashMap<String, String>,
}

impl Placeholders {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from request parameters; the first value of a repeated key wins.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut placeholders = Self::new();
        for (key, value) in params {
            placeholders
                .values
                .entry(key.as_ref().to_lowercase())
                .or_insert_with(|| value.into());
        }
        placeholders
    }

    /// Set (or overwrite) a value.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    /// Look up a value by case-insensitive name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Add `target` and the derived `target_*` fields.
    ///
    /// Host and port are taken as written in the target, so an explicit
    /// default port such as `:443` is kept. A target without a scheme is
    /// treated as a bare path. Targets that fail to parse only set `target`.
    pub fn add_target(&mut self, target: &str) {
        self.insert("target", target);

        let Some(parts) = TargetParts::parse(target) else {
            return;
        };

        let path = if parts.path.is_empty() { "/" } else { parts.path };
        self.insert("target_base", format!("{}://{}", parts.scheme, parts.host));
        self.insert("target_host", parts.host);
        self.insert("target_port", parts.port);
        self.insert("target_scheme", parts.scheme);
        self.insert("target_path", path);
    }
}

/// Target components as written, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TargetParts<'a> {
    scheme: String,
    /// Host including any explicit port.
    host: &'a str,
    port: &'a str,
    path: &'a str,
}

impl<'a> TargetParts<'a> {
    fn parse(target: &'a str) -> Option<Self> {
        let trimmed = target.trim_matches(|c: char| c <= ' ');
        let (scheme, rest) = match Url::parse(trimmed) {
            Ok(url) => {
                let (_, rest) = trimmed.split_once(':')?;
                (url.scheme().to_string(), rest)
            }
            Err(ParseError::RelativeUrlWithoutBase) => (String::new(), trimmed),
            Err(_) => return None,
        };

        let end = rest.find(['?', '#']).unwrap_or(rest.len());
        let rest = &rest[..end];

        let (authority, path) = match rest.strip_prefix("//") {
            Some(hier) => hier.split_at(hier.find('/').unwrap_or(hier.len())),
            // `scheme:opaque` has no path.
            None if !scheme.is_empty() && !rest.starts_with('/') => ("", ""),
            None => ("", rest),
        };

        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let port = match host.rsplit_once(':') {
            Some((_, port)) if port.bytes().all(|b| b.is_ascii_digit()) => port,
            _ => "",
        };

        Some(Self {
            scheme,
            host,
            port,
            path,
        })
    }
}
