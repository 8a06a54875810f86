//! Session maintenance: refreshing the at token from the landing page.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult};

use crate::client::ApiClient;

lazy_static! {
    static ref AT_TOKEN_RE: Regex = Regex::new(r#""SNlM0e":"([^"]+)""#).unwrap();
}

/// Scrape the at token out of the service landing page.
pub fn parse_at_token(html: &str) -> Option<String> {
    AT_TOKEN_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl ApiClient {
    /// Fetch a fresh at token for the session.
    pub async fn fetch_at_token(&self, credentials: &SessionCredentials) -> GpResult<String> {
        let resp = self.get("/", credentials).await?;
        let html = ApiClient::response_text(resp).await?;
        let token = parse_at_token(&html).ok_or_else(|| {
            GpError::AuthFailed("landing page has no at token, cookies may have expired".into())
        })?;
        debug!("fetched at token ({} chars)", token.len());
        Ok(token)
    }
}
