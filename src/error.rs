//! Custom error types for backport-pr.

use thiserror::Error;

/// Main error type for backport operations.
#[derive(Error, Debug)]
pub enum BackportError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Git subprocess errors
    #[error("Unable to locate git executable: {0}")]
    GitNotFound(String),

    #[error("git {command} failed with exit code {exit_code}: {stderr}")]
    GitCommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Unexpected error: {0}")]
    CherryPickFailed(String),

    // Forge errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl BackportError {
    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create a git command failure from the argv and captured stderr
    pub fn git_command_failed(
        args: &[String],
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::GitCommandFailed {
            command: args.join(" "),
            exit_code,
            stderr: stderr.into(),
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for BackportError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = BackportError::forge("API call failed");
        assert_eq!(err.to_string(), "Forge operation failed: API call failed");

        let err = BackportError::invalid_config("missing field");
        assert_eq!(err.to_string(), "Invalid configuration: missing field");

        let err = BackportError::CherryPickFailed("conflict".into());
        assert_eq!(err.to_string(), "Unexpected error: conflict");
    }

    #[test]
    fn test_git_command_failed_joins_args() {
        let args = vec!["fetch".to_string(), "--all".to_string()];
        let err = BackportError::git_command_failed(&args, 128, "no remote");
        assert_eq!(
            err.to_string(),
            "git fetch --all failed with exit code 128: no remote"
        );
    }

    #[test]
    fn test_from_conversions() {
        let url_err = url::Url::parse("not a url");
        assert!(url_err.is_err());
        let err: BackportError = url_err.unwrap_err().into();
        assert!(matches!(err, BackportError::UrlError(_)));
    }
}
