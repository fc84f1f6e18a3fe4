//! Application context - configuration plus the authenticated SIS client

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use roombook_domain::{Config, Credentials};
use roombook_infra::secrets::provider_for;
use roombook_infra::{config, SisClient};
use tracing::debug;

/// Everything a command needs, built once per process.
pub struct AppContext {
    pub config: Config,
    pub client: Arc<SisClient>,
}

impl AppContext {
    /// Load configuration, fetch the password and build the client.
    ///
    /// `config_path` forces a file load; without it the environment is tried
    /// first and a config file in the usual places second.
    pub fn new(config_path: Option<std::path::PathBuf>) -> anyhow::Result<Self> {
        let config = config::load(config_path).context("failed to load configuration")?;

        let provider = provider_for(&config.secret);
        let password = provider
            .secret(&config.secret.name)
            .with_context(|| format!("failed to read secret '{}'", config.secret.name))?;

        let credentials = Credentials::new(&config.sis.base_url, &config.sis.username, password);
        let timeout = Duration::from_secs(config.sis.request_timeout_secs);
        let client = SisClient::new(credentials, timeout).context("failed to build SIS client")?;

        debug!(
            base_url = %config.sis.base_url,
            secret_source = %config.secret.source,
            "application context ready"
        );

        Ok(Self { config, client: Arc::new(client) })
    }
}
