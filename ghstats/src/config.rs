//! Settings and client configuration.
//!
//! Settings come from an optional YAML document and are overridden by CLI
//! flags. The resolved values are captured in [`ClientConfig`], which is the
//! only configuration the API client sees. Usernames are checked here as
//! well so that only route-safe identities reach the network.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::SortKey,
    error::{self, Error}
};

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Per-request timeout applied when the settings do not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_TIMEOUT_SECS: u64 = 300;
const DEFAULT_TOP_COUNT: usize = 10;

/// User-editable settings loaded from a YAML document.
///
/// # Examples
///
/// ```
/// use ghstats::parse_settings;
///
/// let settings = parse_settings("include_forks: true\nsort: forks\n")?;
/// assert!(settings.include_forks);
/// assert_eq!(settings.top_repos, 10);
/// # Ok::<(), ghstats::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the API, overridable for GitHub Enterprise installations.
    pub api_url:       String,
    /// Per-request timeout in seconds.
    pub timeout_secs:  u64,
    /// Whether forked repositories take part in aggregates.
    pub include_forks: bool,
    /// Number of repositories listed by `top`.
    pub top_repos:     usize,
    /// Number of languages listed by `languages` and `overview`.
    pub top_languages: usize,
    /// Default ranking metric for `top`.
    pub sort:          SortKey
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url:       DEFAULT_API_URL.to_owned(),
            timeout_secs:  DEFAULT_TIMEOUT_SECS,
            include_forks: false,
            top_repos:     DEFAULT_TOP_COUNT,
            top_languages: DEFAULT_TOP_COUNT,
            sort:          SortKey::Stars
        }
    }
}

impl Settings {
    /// Builds the client configuration for these settings and an optional
    /// credential.
    pub fn client_config(&self, token: Option<String>) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            token:   token.filter(|value| !value.trim().is_empty())
        }
    }
}

/// Loads settings from the provided YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and the errors of
/// [`parse_settings`] otherwise.
pub fn load_settings(path: &Path) -> Result<Settings, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_settings(&contents)
}

/// Parses and validates settings from a YAML document string.
///
/// An empty document yields the defaults.
///
/// # Errors
///
/// Propagates [`Error::Parse`] for malformed YAML or unknown keys and returns
/// [`Error::Validation`] when a value is out of range.
pub fn parse_settings(contents: &str) -> Result<Settings, Error> {
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    let mut settings: Settings = serde_yaml::from_str(contents)?;
    settings.api_url = normalize_api_url(&settings.api_url)?;

    if !(1..=MAX_TIMEOUT_SECS).contains(&settings.timeout_secs) {
        return Err(Error::validation(format!(
            "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
        )));
    }

    Ok(settings)
}

fn normalize_api_url(input: &str) -> Result<String, Error> {
    let trimmed = input.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(Error::validation(format!(
            "api_url must be an http(s) URL, got '{input}'"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Resolved configuration handed to the API client.
///
/// The credential is immutable once a client is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that relative routes are resolved against.
    pub api_url: String,
    /// Fixed timeout applied to every request.
    pub timeout: Duration,
    /// Optional token forwarded as `Authorization: token <value>`.
    pub token:   Option<String>
}

impl Default for ClientConfig {
    fn default() -> Self {
        Settings::default().client_config(None)
    }
}

/// Trims a GitHub username and checks it can be placed in a route.
///
/// Existence is left to the API: a well-formed but unknown login is reported
/// as [`Error::NotFound`] by the first request.
///
/// # Errors
///
/// Returns [`Error::Validation`] for empty input or input containing
/// whitespace or URL delimiters (`/`, `?`, `#`).
pub fn normalize_identity(input: &str) -> Result<String, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("username must not be empty"));
    }
    if trimmed.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#')) {
        return Err(Error::validation(format!("'{trimmed}' is not a valid GitHub username")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = parse_settings("  \n").expect("expected defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.timeout_secs, 10);
    }

    #[test]
    fn parses_overrides_and_trims_api_url() {
        let yaml = r"
api_url: https://github.example.com/api/v3/
timeout_secs: 30
include_forks: true
top_repos: 3
top_languages: 5
sort: updated
";
        let settings = parse_settings(yaml).expect("expected valid settings");
        assert_eq!(settings.api_url, "https://github.example.com/api/v3");
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.include_forks);
        assert_eq!(settings.top_repos, 3);
        assert_eq!(settings.top_languages, 5);
        assert_eq!(settings.sort, SortKey::Updated);
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = parse_settings("colour: blue\n").expect_err("expected parse failure");
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        for value in ["0", "301"] {
            let error = parse_settings(&format!("timeout_secs: {value}\n"))
                .expect_err("expected validation failure");
            match error {
                Error::Validation {
                    message
                } => assert!(message.contains("timeout_secs")),
                other => panic!("expected validation error, got {other:?}")
            }
        }
    }

    #[test]
    fn rejects_non_http_api_url() {
        let error = parse_settings("api_url: ftp://example.com\n").expect_err("expected failure");
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn load_settings_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("expected temp file");
        write!(file, "top_repos: 7\n").expect("expected write to succeed");

        let settings = load_settings(file.path()).expect("expected load to succeed");
        assert_eq!(settings.top_repos, 7);
        assert_eq!(settings.top_languages, 10);
    }

    #[test]
    fn load_settings_reports_io_errors() {
        let path = Path::new("/nonexistent/ghstats.yaml");
        let error = load_settings(path).expect_err("expected io error");
        assert!(matches!(error, Error::Io { .. }));
    }

    #[test]
    fn client_config_drops_blank_tokens() {
        let settings = Settings::default();
        assert_eq!(settings.client_config(Some("  ".to_owned())).token, None);
        assert_eq!(
            settings.client_config(Some("abc".to_owned())).token.as_deref(),
            Some("abc")
        );
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn normalize_identity_accepts_route_safe_logins() {
        assert_eq!(normalize_identity("  octocat ").expect("valid"), "octocat");
        assert_eq!(normalize_identity("a-b-c1").expect("valid"), "a-b-c1");
        assert_eq!(
            normalize_identity("this_user_definitely_does_not_exist_12345").expect("valid"),
            "this_user_definitely_does_not_exist_12345"
        );
        assert!(normalize_identity(&"a".repeat(60)).is_ok());
    }

    #[test]
    fn normalize_identity_rejects_unsafe_input() {
        for input in ["", "   ", "octo cat", "octo/cat", "octo?cat", "octo#cat", "../repos"] {
            let error = normalize_identity(input).expect_err("expected validation failure");
            assert!(matches!(error, Error::Validation { .. }), "input {input:?}");
        }
    }
}
