//! Secrets from the system keyring
use keyring::Entry;
use roombook_core::SecretProvider;
use roombook_domain::Result;
use tracing::debug;

use crate::errors::InfraError;

/// Reads secrets stored under `service` in the OS credential store.
///
/// The secret name is used as the keyring user.
#[derive(Debug, Clone)]
pub struct KeyringSecretProvider {
    service: String,
}

impl KeyringSecretProvider {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl SecretProvider for KeyringSecretProvider {
    fn secret(&self, name: &str) -> Result<String> {
        let entry = Entry::new(&self.service, name).map_err(InfraError::from)?;
        let secret = entry.get_password().map_err(InfraError::from)?;
        debug!(service = %self.service, name, "secret read from keyring");
        Ok(secret)
    }
}
