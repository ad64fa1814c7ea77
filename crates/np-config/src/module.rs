//! Probe module types.
//!
//! A module names one configured check. Only the `nagios` prober is handled
//! by this workspace; other prober kinds are accepted so a shared modules
//! file still loads.
//!
//! ```yaml
//! modules:
//!   reva_login:
//!     prober: nagios
//!     timeout_ms: 10000
//!     nagios:
//!       check: check_reva_login
//!       arguments:
//!         - "-target $target_host$"
//!         - "-user $testclient_id$"
//!         - "-pass $testclient_secret$"
//!       proxy_url: http://proxy.example.org:3128
//!       treat_warnings_as_failure: false
//! ```

use serde::{Deserialize, Serialize};

/// Deadline applied to a probe when the module does not set one.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

/// Prober implementation a module is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProberKind {
    #[default]
    Nagios,
    Http,
    Tcp,
    Icmp,
    Dns,
}

impl std::fmt::Display for ProberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProberKind::Nagios => write!(f, "nagios"),
            ProberKind::Http => write!(f, "http"),
            ProberKind::Tcp => write!(f, "tcp"),
            ProberKind::Icmp => write!(f, "icmp"),
            ProberKind::Dns => write!(f, "dns"),
        }
    }
}

/// One entry of the `modules` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub prober: ProberKind,

    /// Probe deadline in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub nagios: CheckModule,
}

impl Module {
    /// Effective probe deadline in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS)
    }
}

/// Settings of a Nagios check module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckModule {
    /// Check binary: absolute path or bare name.
    #[serde(default)]
    pub check: String,

    /// Argument templates; entries may contain `$placeholder$` tokens.
    #[serde(default)]
    pub arguments: Vec<String>,

    /// Proxy exported to the plugin through its environment.
    #[serde(default)]
    pub proxy_url: String,

    /// Count WARNING results as probe failures.
    #[serde(default)]
    pub treat_warnings_as_failure: bool,
}

impl CheckModule {
    /// Create a module for the given check binary and argument templates.
    pub fn new<I, S>(check: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            check: check.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = proxy_url.into();
        self
    }

    /// Treat warnings as failures.
    pub fn with_warnings_as_failure(mut self, enabled: bool) -> Self {
        self.treat_warnings_as_failure = enabled;
        self
    }

    /// Proxy URL, if one is configured.
    pub fn proxy(&self) -> Option<&str> {
        if self.proxy_url.is_empty() {
            None
        } else {
            Some(&self.proxy_url)
        }
    }
}
