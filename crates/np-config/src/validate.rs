//! Configuration validation errors and semantic validation.

use thiserror::Error;
use url::Url;

use crate::module::{Module, ProberKind};
use crate::prober::ProberConfig;
use crate::siteacc::SiteAccountsConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
        }
    }
}

/// Validate a whole prober configuration.
pub fn validate_prober_config(config: &ProberConfig) -> ValidationResult<()> {
    for (name, module) in &config.modules {
        validate_module(name, module)?;
    }

    if let Some(siteacc) = &config.site_accounts {
        validate_site_accounts(siteacc)?;
    }

    Ok(())
}

/// Validate one module.
pub fn validate_module(name: &str, module: &Module) -> ValidationResult<()> {
    if module.timeout_ms == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: format!("modules.{name}.timeout_ms"),
            message: "timeout must be greater than zero".to_string(),
        });
    }

    if module.prober != ProberKind::Nagios {
        return Ok(());
    }

    if module.nagios.check.trim().is_empty() {
        return Err(ValidationError::MissingField(format!(
            "modules.{name}.nagios.check"
        )));
    }

    if let Some(proxy) = module.nagios.proxy() {
        Url::parse(proxy).map_err(|e| ValidationError::InvalidValue {
            field: format!("modules.{name}.nagios.proxy_url"),
            message: e.to_string(),
        })?;
    }

    Ok(())
}

/// Validate the site accounts service settings.
///
/// An empty URL is valid (the service is simply not configured); a set URL
/// must be https.
pub fn validate_site_accounts(config: &SiteAccountsConfig) -> ValidationResult<()> {
    if !config.is_configured() {
        return Ok(());
    }

    let url = Url::parse(&config.url).map_err(|e| ValidationError::InvalidValue {
        field: "site_accounts.url".to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "https" {
        return Err(ValidationError::InvalidValue {
            field: "site_accounts.url".to_string(),
            message: format!("scheme must be https, got {}", url.scheme()),
        });
    }

    if config.security.credentials_passphrase.is_empty() {
        return Err(ValidationError::SemanticError(
            "site_accounts.security.credentials_passphrase is required when a URL is set"
                .to_string(),
        ));
    }

    Ok(())
}
