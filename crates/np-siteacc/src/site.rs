//! Wire types of the site accounts service.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteAccError};

/// Envelope returned by the service: `{success, data: {site}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default)]
    pub data: QueryData,
}

/// Payload of a `site-get` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryData {
    #[serde(default)]
    pub site: Option<Site>,
}

/// A registered site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub config: SiteConfiguration,
}

/// Per-site settings held by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfiguration {
    #[serde(default)]
    pub test_client_credentials: TestClientCredentials,
}

/// Encrypted test-client credentials, base64 encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestClientCredentials {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub secret: String,
}

impl QueryResponse {
    /// Decode a response body and return the site it carries.
    pub fn parse_site(body: &str) -> Result<Site> {
        let response: QueryResponse = serde_json::from_str(body)?;
        if !response.success {
            return Err(SiteAccError::InvalidResponse(
                "service reported failure".to_string(),
            ));
        }

        response
            .data
            .site
            .ok_or_else(|| SiteAccError::InvalidResponse("response carries no site".to_string()))
    }
}
