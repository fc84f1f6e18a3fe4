//! Credentials for the SIS APIs

use std::fmt;

/// Base URL plus the Basic Auth pair attached to every request.
///
/// Supplied once when the client is built and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: String,
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, username: username.into(), password: password.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the secret out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let credentials = Credentials::new("https://api.example.sc/", "importer", "pw");
        assert_eq!(credentials.base_url(), "https://api.example.sc");
    }

    #[test]
    fn debug_output_redacts_password() {
        let credentials = Credentials::new("https://api.example.sc", "importer", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("importer"));
        assert!(!rendered.contains("hunter2"));
    }
}
