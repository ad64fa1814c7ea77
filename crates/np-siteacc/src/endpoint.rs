//! Endpoint URL generation.

use url::Url;

use crate::error::{Result, SiteAccError};

/// Operation returning one site's record.
pub const SITE_GET_ENDPOINT: &str = "site-get";

/// Build `<base>/<endpoint>?<params>`.
///
/// The endpoint is appended as a path segment to whatever path the base URL
/// already carries; query parameters are form-encoded in the given order.
pub fn generate_url(base: &str, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| SiteAccError::InvalidUrl(e.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| SiteAccError::InvalidUrl(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push(endpoint);

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}
