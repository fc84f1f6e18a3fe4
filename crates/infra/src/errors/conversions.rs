//! Conversions from external infrastructure errors into domain errors.

use csv::Error as CsvError;
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use roombook_domain::{RoombookError, SisError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RoombookError);

impl From<InfraError> for RoombookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RoombookError> for InfraError {
    fn from(value: RoombookError) -> Self {
        InfraError(value)
    }
}

impl InfraError {
    /// Narrow to the SIS error carried by HTTP failures.
    ///
    /// Anything that is not already a `SisError` becomes a network error so
    /// API operations keep their closed error set.
    pub fn into_sis(self) -> SisError {
        match self.0 {
            RoombookError::Sis(err) => err,
            other => SisError::Network(other.to_string()),
        }
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRoombookError {
    fn into_roombook(self) -> RoombookError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl IntoRoombookError for KeyringError {
    fn into_roombook(self) -> RoombookError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => RoombookError::Secret("keychain entry not found".into()),
            BadEncoding(_) => {
                RoombookError::Secret("credential in keychain is not valid UTF-8".into())
            }
            Ambiguous(entries) => RoombookError::Secret(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => {
                RoombookError::Secret(format!("keychain platform error: {err}"))
            }
            NoStorageAccess(err) => {
                RoombookError::Secret(format!("unable to access secure storage: {err}"))
            }
            _ => RoombookError::Secret(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_roombook())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl IntoRoombookError for HttpError {
    fn into_roombook(self) -> RoombookError {
        if self.is_timeout() {
            return SisError::Network("HTTP request timed out".into()).into();
        }

        if self.is_connect() {
            return SisError::Network("HTTP connection failure".into()).into();
        }

        if self.is_builder() {
            return SisError::InvalidRequest(self.to_string()).into();
        }

        if let Some(status) = self.status() {
            return SisError::Transport { status: status.as_u16(), body: String::new() }.into();
        }

        SisError::Network(self.to_string()).into()
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_roombook())
    }
}

/* -------------------------------------------------------------------------- */
/* csv::Error → RoombookError */
/* -------------------------------------------------------------------------- */

impl IntoRoombookError for CsvError {
    fn into_roombook(self) -> RoombookError {
        let line = self.position().map(|pos| pos.line());
        match (self.kind(), line) {
            (csv::ErrorKind::Io(err), _) => RoombookError::Input(err.to_string()),
            (_, Some(line)) => RoombookError::Input(format!("line {line}: {self}")),
            (_, None) => RoombookError::Input(self.to_string()),
        }
    }
}

impl From<CsvError> for InfraError {
    fn from(value: CsvError) -> Self {
        InfraError(value.into_roombook())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_secret_error() {
        let mapped: RoombookError = InfraError::from(KeyringError::NoEntry).into();
        match mapped {
            RoombookError::Secret(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected secret error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_error_keeps_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped = InfraError::from(error).into_sis();
        assert_eq!(mapped.status(), Some(401));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped = InfraError::from(error).into_sis();
        assert!(matches!(mapped, SisError::Network(_)), "got {mapped:?}");
    }

    #[test]
    fn csv_errors_become_input_errors() {
        let mut reader = csv::ReaderBuilder::new().from_reader("a,b\n1,2,3\n".as_bytes());
        let error = reader.records().find_map(Result::err).unwrap();

        let mapped: RoombookError = InfraError::from(error).into();
        assert!(matches!(mapped, RoombookError::Input(_)), "got {mapped:?}");
    }
}
