//! Configuration for the forge connection.
use secrecy::SecretString;
use url::Url;

use crate::{error::BackportError, result::Result};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Remote repository connection configuration for authenticating and
/// interacting with the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// REST API base URL.
    pub api_url: Url,
    /// Access token for authentication.
    pub token: SecretString,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: "".to_string(),
            repo: "".to_string(),
            // constant is a valid absolute URL
            api_url: Url::parse(DEFAULT_API_URL).unwrap(),
            token: SecretString::from("".to_string()),
        }
    }
}

impl RemoteConfig {
    /// Build a remote from an `owner/repo` slug, API URL and token.
    pub fn new(repository: &str, api_url: &str, token: SecretString) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        let api_url = Url::parse(api_url).map_err(BackportError::from)?;

        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(BackportError::invalid_config(
                "only http and https schemes are supported for the api url",
            )
            .into());
        }

        Ok(Self {
            owner,
            repo,
            api_url,
            token,
        })
    }

    /// API base URL without a trailing slash.
    pub fn base_uri(&self) -> String {
        self.api_url.as_str().trim_end_matches('/').to_string()
    }
}

/// Split an `owner/repo` slug.
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    let repository = repository.trim();

    match repository.split_once('/') {
        Some((owner, repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(BackportError::invalid_config(format!(
            "repository must be in owner/repo form: '{repository}'"
        ))
        .into()),
    }
}
