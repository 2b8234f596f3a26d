// UI configuration
use anyhow::Result;
use serde::Deserialize;

use crate::routing::{AuthView, SponsorView};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_LOG_FILTER: &str = "destinypal_ui=debug";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Backend base URL, without a trailing slash.
    pub api_base_url: String,
    pub log_filter: String,
    /// Auth flow view for unmapped paths. At `/` the landing page is routed
    /// and always wins, so this only applies to paths the table does not
    /// know.
    pub auth_default_view: AuthView,
    /// Sponsor dashboard view shown at `/` and on unmapped paths.
    pub sponsor_default_view: SponsorView,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: trim_base_url(option_env!("DESTINYPAL_API_URL").unwrap_or(DEFAULT_API_URL)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            auth_default_view: AuthView::Landing,
            sponsor_default_view: SponsorView::BrowseStudents,
        }
    }
}

impl Config {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a key lookup, falling back to defaults for
    /// missing keys. Unknown view names are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Config {
            api_base_url: lookup("DESTINYPAL_API_URL")
                .map(|url| trim_base_url(&url))
                .unwrap_or(defaults.api_base_url),
            log_filter: lookup("DESTINYPAL_LOG").unwrap_or(defaults.log_filter),
            auth_default_view: lookup("DESTINYPAL_AUTH_VIEW")
                .map(|view| view.parse())
                .transpose()?
                .unwrap_or(defaults.auth_default_view),
            sponsor_default_view: lookup("DESTINYPAL_SPONSOR_VIEW")
                .map(|view| view.parse())
                .transpose()?
                .unwrap_or(defaults.sponsor_default_view),
        })
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.auth_default_view, AuthView::Landing);
        assert_eq!(config.sponsor_default_view, SponsorView::BrowseStudents);
        assert!(!config.api_base_url.ends_with('/'));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DESTINYPAL_API_URL", "https://api.destinypal.org/api/v1/"),
            ("DESTINYPAL_AUTH_VIEW", "login"),
            ("DESTINYPAL_SPONSOR_VIEW", "impact"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.destinypal.org/api/v1");
        assert_eq!(config.auth_default_view, AuthView::Login);
        assert_eq!(config.sponsor_default_view, SponsorView::Impact);
    }

    #[test]
    fn test_unknown_view_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DESTINYPAL_SPONSOR_VIEW", "student-help")]))
            .unwrap_err();
        assert!(err.to_string().contains("student-help"));
    }
}
