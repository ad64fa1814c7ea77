//! HTTPS client for the site accounts service.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use np_config::SiteAccountsConfig;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::SiteCredentials;
use crate::endpoint::{generate_url, SITE_GET_ENDPOINT};
use crate::error::{Result, SiteAccError};
use crate::site::QueryResponse;
use crate::CredentialSource;

/// Stateless client for the site accounts service.
///
/// Holds only the configuration injected at startup.
#[derive(Debug, Clone)]
pub struct SiteAccountsClient {
    config: SiteAccountsConfig,
}

impl SiteAccountsClient {
    /// Create a client from explicit configuration.
    pub fn new(config: SiteAccountsConfig) -> Self {
        Self { config }
    }

    /// The configuration this client was created with.
    pub fn config(&self) -> &SiteAccountsConfig {
        &self.config
    }

    /// Query the decrypted test-user credentials of `site`.
    ///
    /// Configuration problems are reported before any request is sent.
    pub fn query_site_credentials(
        &self,
        site: &str,
        timeout: Option<Duration>,
    ) -> Result<SiteCredentials> {
        let passphrase = self.check_config()?;
        let url = generate_url(&self.config.url, SITE_GET_ENDPOINT, &[("site", site)])?;

        let body = self.read_endpoint(&url, timeout)?;
        let site_record = QueryResponse::parse_site(&body)?;

        site_record
            .config
            .test_client_credentials
            .decrypt(passphrase)
            .inspect_err(|e| warn!(site, error = %e, "failed to decrypt site credentials"))
    }

    fn check_config(&self) -> Result<&str> {
        if self.config.url.is_empty() {
            return Err(SiteAccError::MissingUrl);
        }
        let passphrase = self.config.security.credentials_passphrase.as_str();
        if passphrase.is_empty() {
            return Err(SiteAccError::MissingPassphrase);
        }
        Ok(passphrase)
    }

    /// GET `url` with basic auth; both request and final response URL must be https.
    fn read_endpoint(&self, url: &Url, timeout: Option<Duration>) -> Result<String> {
        require_https(url.as_str())?;

        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let agent = builder.build();

        debug!(endpoint = %redact_query(url), "querying site accounts service");

        let auth = &self.config.authentication;
        let token = BASE64.encode(format!("{}:{}", auth.username, auth.password));
        let response = agent
            .get(url.as_str())
            .set("Authorization", &format!("Basic {token}"))
            .set("Accept", "application/json")
            .call()?;

        require_https(response.get_url())?;

        Ok(response.into_string()?)
    }
}

impl CredentialSource for SiteAccountsClient {
    fn site_credentials(&self, site: &str, timeout: Option<Duration>) -> Result<SiteCredentials> {
        self.query_site_credentials(site, timeout)
    }
}

fn require_https(url: &str) -> Result<()> {
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "https" => Ok(()),
        Ok(_) => Err(SiteAccError::InsecureTransport {
            url: url.to_string(),
        }),
        Err(e) => Err(SiteAccError::InvalidUrl(e.to_string())),
    }
}

fn redact_query(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
