//! Site accounts credential broker.
//!
//! Probes that reference a `site` need that site's test-client credentials.
//! They are stored encrypted in the site accounts service; this crate
//! fetches them over HTTPS and decrypts them with the configured passphrase.
//!
//! Every lookup is a fresh request: nothing is cached and nothing is retried.
//!
//! ```no_run
//! use np_config::SiteAccountsConfig;
//! use np_siteacc::{CredentialSource, SiteAccountsClient};
//! use std::time::Duration;
//!
//! let config = SiteAccountsConfig::new("https://accounts.example.org/api")
//!     .with_auth("prober", "s3cret")
//!     .with_passphrase("passphrase");
//! let client = SiteAccountsClient::new(config);
//! let creds = client.site_credentials("CERN", Some(Duration::from_secs(5)))?;
//! println!("client id: {}", creds.client_id);
//! # Ok::<(), np_siteacc::SiteAccError>(())
//! ```

pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod site;

pub use client::SiteAccountsClient;
pub use credentials::{decrypt_credential, encrypt_credential, SiteCredentials};
pub use endpoint::{generate_url, SITE_GET_ENDPOINT};
pub use error::{ErrorClass, Result, SiteAccError};
pub use site::{QueryResponse, Site, SiteConfiguration, TestClientCredentials};

use std::time::Duration;

/// Provider of per-site test-client credentials.
pub trait CredentialSource: Send + Sync {
    /// Fetch and decrypt the credentials of `site`.
    ///
    /// `timeout` is the caller's remaining deadline; `None` means unbounded.
    fn site_credentials(&self, site: &str, timeout: Option<Duration>) -> Result<SiteCredentials>;
}
