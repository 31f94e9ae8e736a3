use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_optional, env_parse_or, env_required};

use crate::models::ContentReference;

/// Connection settings for a remote content API.
///
/// # Example
///
/// ```ignore
/// use cms_client::{ContentApiConfig, ContentReference};
///
/// let config = ContentApiConfig::new("http://cms.internal:8080")
///     .with_root(ContentReference::new(17))
///     .with_api_key("secret");
///
/// // From environment variables (requires `config` feature)
/// let config = ContentApiConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct ContentApiConfig {
    /// Base URL of the content API, without a trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Container page under which products are created
    pub root: ContentReference,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ContentApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            root: ContentReference::new(1),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_root(mut self, root: ContentReference) -> Self {
        self.root = root;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Read the product root from `CMS_ROOT_ID` (default 1), rejecting the empty reference
#[cfg(feature = "config")]
pub fn root_from_env() -> Result<ContentReference, ConfigError> {
    let root: ContentReference = env_parse_or("CMS_ROOT_ID", ContentReference::new(1))?;
    if root.is_empty() {
        return Err(ConfigError::ParseError {
            key: "CMS_ROOT_ID".to_string(),
            details: "root reference must not be empty".to_string(),
        });
    }
    Ok(root)
}

/// Load ContentApiConfig from environment variables
///
/// Environment variables:
/// - `CMS_BASE_URL` (required) - content API base URL
/// - `CMS_API_KEY` (optional) - bearer token
/// - `CMS_ROOT_ID` (optional, default: 1) - container reference for products
/// - `CMS_TIMEOUT_SECS` (optional, default: 10)
#[cfg(feature = "config")]
impl FromEnv for ContentApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_required("CMS_BASE_URL")?;
        let root = root_from_env()?;
        let timeout_secs: u64 = env_parse_or("CMS_TIMEOUT_SECS", 10)?;

        let mut config = Self::new(base_url)
            .with_root(root)
            .with_timeout(Duration::from_secs(timeout_secs));
        config.api_key = env_optional("CMS_API_KEY");
        Ok(config)
    }
}

#[cfg(all(test, feature = "config"))]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("CMS_BASE_URL", Some("http://cms.local/")),
                ("CMS_API_KEY", None),
                ("CMS_ROOT_ID", None),
                ("CMS_TIMEOUT_SECS", None),
            ],
            || {
                let config = ContentApiConfig::from_env().unwrap();
                assert_eq!(config.base_url, "http://cms.local");
                assert_eq!(config.api_key, None);
                assert_eq!(config.root, ContentReference::new(1));
                assert_eq!(config.timeout, Duration::from_secs(10));
            },
        );
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("CMS_BASE_URL", Some("http://cms.local")),
                ("CMS_API_KEY", Some("secret")),
                ("CMS_ROOT_ID", Some("42")),
                ("CMS_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = ContentApiConfig::from_env().unwrap();
                assert_eq!(config.api_key.as_deref(), Some("secret"));
                assert_eq!(config.root, ContentReference::new(42));
                assert_eq!(config.timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn test_from_env_requires_base_url() {
        temp_env::with_var_unset("CMS_BASE_URL", || {
            let result = ContentApiConfig::from_env();
            assert!(
                matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "CMS_BASE_URL")
            );
        });
    }

    #[test]
    fn test_root_from_env() {
        temp_env::with_var_unset("CMS_ROOT_ID", || {
            assert_eq!(root_from_env().unwrap(), ContentReference::new(1));
        });
        temp_env::with_var("CMS_ROOT_ID", Some("0"), || {
            let result = root_from_env();
            assert!(
                matches!(result, Err(ConfigError::ParseError { key, .. }) if key == "CMS_ROOT_ID")
            );
        });
    }

    #[test]
    fn test_from_env_rejects_bad_root() {
        temp_env::with_vars(
            [("CMS_BASE_URL", Some("http://cms.local")), ("CMS_ROOT_ID", Some("root"))],
            || {
                assert!(ContentApiConfig::from_env().is_err());
            },
        );
        temp_env::with_vars(
            [("CMS_BASE_URL", Some("http://cms.local")), ("CMS_ROOT_ID", Some("0"))],
            || {
                assert!(ContentApiConfig::from_env().is_err());
            },
        );
    }
}
