//! Parsing of `Name <email>` display strings.
use regex::Regex;
use std::{fmt, sync::LazyLock};

static DISPLAY_NAME_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<name>[^<]+)\s*<(?<email>[^>]+)>$").unwrap()
});

/// A git identity made of a display name and an email address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Parse a `Name <email>` display string.
    ///
    /// Strings without an angle-bracketed email are taken verbatim as the
    /// name and yield an empty email.
    pub fn parse(display: &str) -> Self {
        if let Some(captures) = DISPLAY_NAME_EMAIL_REGEX.captures(display) {
            return Self::new(
                captures["name"].trim(),
                captures["email"].trim(),
            );
        }

        Self::new(display, "")
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
