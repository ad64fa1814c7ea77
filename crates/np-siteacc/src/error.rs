//! Error types for the credential broker.

use thiserror::Error;

/// Result type for site accounts operations.
pub type Result<T> = std::result::Result<T, SiteAccError>;

/// Broad class of a broker failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The broker is not (correctly) configured; no request was sent.
    Configuration,
    /// The request could not be completed.
    Transport,
    /// The service answered with something unusable.
    Response,
    /// The stored credentials could not be decrypted.
    Decryption,
}

/// Errors that can occur while looking up site credentials.
#[derive(Error, Debug)]
pub enum SiteAccError {
    #[error("no site accounts service URL configured")]
    MissingUrl,

    #[error("no site accounts credentials passphrase configured")]
    MissingPassphrase,

    #[error("error while generating endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("refusing to use insecure transport for {url}")]
    InsecureTransport { url: String },

    #[error("error while reading site accounts endpoint: {source}")]
    Http {
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("site accounts endpoint returned status {code}")]
    Status { code: u16 },

    #[error("error while reading site accounts response body: {0}")]
    Read(#[from] std::io::Error),

    #[error("unable to unmarshal response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid response received: {0}")]
    InvalidResponse(String),

    #[error("unable to decrypt test client credentials: {0}")]
    Decrypt(String),
}

impl SiteAccError {
    /// Classify the error.
    pub fn class(&self) -> ErrorClass {
        match self {
            SiteAccError::MissingUrl
            | SiteAccError::MissingPassphrase
            | SiteAccError::InvalidUrl(_)
            | SiteAccError::InsecureTransport { .. } => ErrorClass::Configuration,
            SiteAccError::Http { .. } | SiteAccError::Read(_) => ErrorClass::Transport,
            SiteAccError::Status { .. }
            | SiteAccError::Decode(_)
            | SiteAccError::InvalidResponse(_) => ErrorClass::Response,
            SiteAccError::Decrypt(_) => ErrorClass::Decryption,
        }
    }

    /// Whether the error was raised before any request was attempted.
    pub fn is_config_error(&self) -> bool {
        self.class() == ErrorClass::Configuration
    }
}

impl From<ureq::Error> for SiteAccError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => SiteAccError::Status { code },
            other => SiteAccError::Http {
                source: Box::new(other),
            },
        }
    }
}
