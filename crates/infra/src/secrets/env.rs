//! Secrets from environment variables

use roombook_core::SecretProvider;
use roombook_domain::constants::SECRET_ENV_VAR;
use roombook_domain::{Result, RoombookError};

/// Reads the secret from `ROOMBOOK_SECRET`, or from the variable named after
/// the secret in upper snake case (`ArborStaffUpdaterPassword` becomes
/// `ARBOR_STAFF_UPDATER_PASSWORD`).
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    override_var: String,
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self { override_var: SECRET_ENV_VAR.to_string() }
    }

    /// Variables consulted for `name`, in order
    pub fn candidates(&self, name: &str) -> Vec<String> {
        vec![self.override_var.clone(), upper_snake(name)]
    }
}

impl SecretProvider for EnvSecretProvider {
    fn secret(&self, name: &str) -> Result<String> {
        let candidates = self.candidates(name);
        candidates
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
            .ok_or_else(|| {
                RoombookError::Secret(format!(
                    "secret '{name}' not found; set one of {}",
                    candidates.join(", ")
                ))
            })
    }
}

fn upper_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else {
            if ch.is_ascii_uppercase()
                && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push('_');
            }
            out.push(ch.to_ascii_uppercase());
        }
        previous = Some(ch);
    }
    out.trim_end_matches('_').to_string()
}
