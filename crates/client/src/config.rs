//! Remote endpoint configuration.

use std::env;

/// Reserved placeholder meaning "no remote endpoint deployed yet".
///
/// The client treats this value (and an empty URL) as unconfigured: remote
/// reads short-circuit and dual-write operations skip their mirror call.
pub const PLACEHOLDER_URL: &str = "YOUR_WEB_APP_URL_HERE";

/// Location of the spreadsheet-backed web app.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub web_app_url: String,
}

impl RemoteConfig {
    pub fn new(web_app_url: impl Into<String>) -> Self {
        Self {
            web_app_url: web_app_url.into(),
        }
    }

    /// Read configuration from the environment, falling back to the
    /// unconfigured placeholder.
    pub fn from_env() -> Self {
        Self {
            web_app_url: env::var("STOCKBOOK_WEB_APP_URL")
                .unwrap_or_else(|_| PLACEHOLDER_URL.to_string()),
        }
    }

    /// A deployment counts as configured once the placeholder is replaced.
    pub fn is_configured(&self) -> bool {
        !self.web_app_url.is_empty() && self.web_app_url != PLACEHOLDER_URL
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::new(PLACEHOLDER_URL)
    }
}
