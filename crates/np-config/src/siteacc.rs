//! Site accounts service settings.

use serde::{Deserialize, Serialize};

/// Connection settings for the site accounts service.
///
/// Passed explicitly to the credential broker at startup.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAccountsConfig {
    /// Base URL of the service (must be https).
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub authentication: SiteAccountsAuth,

    #[serde(default)]
    pub security: SiteAccountsSecurity,
}

/// HTTP basic auth credentials for the service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAccountsAuth {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Secrets used to decrypt stored site credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAccountsSecurity {
    #[serde(default)]
    pub credentials_passphrase: String,
}

impl SiteAccountsConfig {
    /// Create a config for the given service URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the basic auth credentials.
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.authentication = SiteAccountsAuth {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set the credentials passphrase.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.security.credentials_passphrase = passphrase.into();
        self
    }

    /// Whether any part of the service is configured.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for SiteAccountsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteAccountsConfig")
            .field("url", &self.url)
            .field("username", &self.authentication.username)
            .field("password", &"*****")
            .field("credentials_passphrase", &"*****")
            .finish()
    }
}

impl std::fmt::Debug for SiteAccountsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteAccountsAuth")
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}

impl std::fmt::Debug for SiteAccountsSecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteAccountsSecurity")
            .field("credentials_passphrase", &"*****")
            .finish()
    }
}
