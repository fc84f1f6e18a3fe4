//! Secret providers for the SIS password
//!
//! The password is fetched once at startup and handed to `Credentials`.

pub mod env;
pub mod keychain;

use roombook_core::SecretProvider;
use roombook_domain::{SecretConfig, SecretSource};

pub use self::env::EnvSecretProvider;
pub use self::keychain::KeyringSecretProvider;

/// Provider selected by `secret.source`.
pub fn provider_for(config: &SecretConfig) -> Box<dyn SecretProvider> {
    match config.source {
        SecretSource::Env => Box::new(EnvSecretProvider::new()),
        SecretSource::Keyring => Box::new(KeyringSecretProvider::new(&config.service)),
    }
}
