//! Cookie-based session credentials.
//!
//! The photo service is driven with the cookies of a logged-in browser
//! session. Credentials are stored as JSON in the same layout browser
//! exporters produce:
//!
//! ```json
//! {
//!   "cookies": [{ "name": "SID", "value": "...", "domain": ".google.com" }],
//!   "persistentParameters": { "userId": "1234567890" },
//!   "runtimeParameters": { "atToken": "..." }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GpError, GpResult};

/// Authentication state attached to every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredentials {
    /// Session cookies.
    #[serde(default)]
    pub cookies: Vec<SessionCookie>,

    /// Parameters that stay valid for the lifetime of the session.
    #[serde(default)]
    pub persistent_parameters: PersistentParameters,

    /// Parameters that must be refreshed from time to time.
    #[serde(default)]
    pub runtime_parameters: RuntimeParameters,
}

/// A single browser cookie.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"********")
            .field("domain", &self.domain)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentParameters {
    /// Account identifier, sent as the upload owner.
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeParameters {
    /// Anti-forgery token required by the mutation endpoint.
    #[serde(default)]
    pub at_token: String,
}

impl SessionCredentials {
    /// Create credentials from cookies and a user id, without an at token.
    pub fn new(cookies: Vec<SessionCookie>, user_id: impl Into<String>) -> Self {
        Self {
            cookies,
            persistent_parameters: PersistentParameters {
                user_id: user_id.into(),
            },
            runtime_parameters: RuntimeParameters::default(),
        }
    }

    /// Load credentials from a JSON file.
    pub fn load_from_file(path: &Path) -> GpResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GpError::Credentials(format!("can't read {}: {e}", path.display()))
        })?;
        let credentials: SessionCredentials = serde_json::from_str(&contents)?;
        Ok(credentials)
    }

    /// Save credentials as pretty JSON, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> GpResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Render the cookies as a `Cookie` request header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn user_id(&self) -> &str {
        &self.persistent_parameters.user_id
    }

    pub fn at_token(&self) -> &str {
        &self.runtime_parameters.at_token
    }

    /// Replace the at token after a refresh.
    pub fn set_at_token(&mut self, token: impl Into<String>) {
        self.runtime_parameters.at_token = token.into();
    }

    /// Whether an at token is available.
    pub fn has_at_token(&self) -> bool {
        !self.runtime_parameters.at_token.is_empty()
    }

    /// Check that the credentials can authenticate an upload.
    pub fn validate(&self) -> GpResult<()> {
        if self.cookies.is_empty() {
            return Err(GpError::Credentials("no session cookies".into()));
        }
        if self.persistent_parameters.user_id.is_empty() {
            return Err(GpError::Credentials("missing user id".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, value: &str) -> SessionCookie {
        SessionCookie {
            name: name.into(),
            value: value.into(),
            domain: ".google.com".into(),
        }
    }

    #[test]
    fn test_cookie_header() {
        let creds = SessionCredentials::new(vec![cookie("SID", "a"), cookie("HSID", "b")], "42");
        assert_eq!(creds.cookie_header(), "SID=a; HSID=b");
    }

    #[test]
    fn test_parse_exported_json() {
        let json = r#"{
            "cookies": [{"name": "SID", "value": "abc", "domain": ".google.com"}],
            "persistentParameters": {"userId": "1234"},
            "runtimeParameters": {"atToken": "tok"}
        }"#;
        let creds: SessionCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.user_id(), "1234");
        assert_eq!(creds.at_token(), "tok");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_default() {
        let creds: SessionCredentials =
            serde_json::from_str(r#"{"cookies": [{"name": "SID", "value": "abc"}]}"#).unwrap();
        assert!(!creds.has_at_token());
        assert!(matches!(creds.validate(), Err(GpError::Credentials(_))));
    }

    #[test]
    fn test_debug_redacts_cookie_values() {
        let creds = SessionCredentials::new(vec![cookie("SID", "secret-value")], "42");
        let printed = format!("{creds:?}");
        assert!(printed.contains("SID"));
        assert!(!printed.contains("secret-value"));
    }

    #[test]
    fn test_empty_credentials_invalid() {
        let creds = SessionCredentials::default();
        assert!(creds.validate().is_err());
    }
}
