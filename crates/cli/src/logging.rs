//! Logging setup and command outcome logging

use std::time::Duration;

use roombook_domain::{RoombookError, SisError};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
///
/// `RUST_LOG` takes precedence over `-v`.
pub fn init(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let builder = fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` must be a stable identifier such as `event-types::create`,
/// never a value taken from user input.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    error: Option<&anyhow::Error>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %format!("{err:#}"),
            "command_execution_failure"
        ),
    }
}

/// Stable label for an error, suitable for log fields.
pub fn error_label(error: &anyhow::Error) -> &'static str {
    if let Some(err) = error.downcast_ref::<RoombookError>() {
        return roombook_error_label(err);
    }
    if let Some(err) = error.downcast_ref::<SisError>() {
        return sis_error_label(err);
    }
    "internal"
}

fn roombook_error_label(error: &RoombookError) -> &'static str {
    match error {
        RoombookError::Config(_) => "config",
        RoombookError::Secret(_) => "secret",
        RoombookError::Input(_) => "input",
        RoombookError::Output(_) => "output",
        RoombookError::InvalidInput(_) => "invalid_input",
        RoombookError::Sis(err) => sis_error_label(err),
        RoombookError::Internal(_) => "internal",
    }
}

fn sis_error_label(error: &SisError) -> &'static str {
    match error {
        SisError::NotFound(_) => "not_found",
        SisError::Transport { .. } => "transport",
        SisError::MalformedResponse(_) => "malformed_response",
        SisError::Network(_) => "network",
        SisError::InvalidRequest(_) => "invalid_request",
    }
}

#[cfg(test)]
mod tests {
    use roombook_domain::EntityKind;

    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "info");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(5), "trace");
    }

    #[test]
    fn labels_follow_the_error_variant() {
        let not_found = anyhow::Error::new(SisError::NotFound(EntityKind::Room));
        assert_eq!(error_label(&not_found), "not_found");

        let wrapped = anyhow::Error::new(RoombookError::from(SisError::Transport {
            status: 500,
            body: String::new(),
        }));
        assert_eq!(error_label(&wrapped), "transport");

        let config = anyhow::Error::new(RoombookError::Config("missing".into()));
        assert_eq!(error_label(&config.context("while loading")), "config");

        assert_eq!(error_label(&anyhow::anyhow!("boom")), "internal");
    }
}
