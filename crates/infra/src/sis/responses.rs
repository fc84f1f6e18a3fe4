//! Response interpretation shared by every REST operation
//!
//! Writes are classified by status alone: POST succeeds only on 201 and
//! DELETE only on 204. Any other status becomes `SisError::Transport` with
//! the body kept verbatim. Reads decode whatever JSON came back.

use reqwest::header::LOCATION;
use reqwest::{Response, StatusCode};
use roombook_domain::{RawResponse, SisError, SisResult};
use serde_json::Value;
use url::Url;

use crate::errors::InfraError;

/// Body and `Location` header of a 201 response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Created {
    pub body: Value,
    pub location: Option<String>,
}

impl Created {
    /// Resource path from the `Location` header, if the server sent one.
    pub fn location_path(&self) -> Option<String> {
        let location = self.location.as_deref()?;
        match Url::parse(location) {
            Ok(url) => Some(url.path().to_string()),
            Err(_) => Some(location.to_string()),
        }
    }
}

pub(crate) async fn expect_created(response: Response) -> SisResult<Created> {
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = read_body(response).await?;

    if status != StatusCode::CREATED {
        return Err(SisError::Transport { status: status.as_u16(), body });
    }

    let body = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    Ok(Created { body, location })
}

pub(crate) async fn expect_deleted(response: Response) -> SisResult<()> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(());
    }
    let body = read_body(response).await?;
    Err(SisError::Transport { status: status.as_u16(), body })
}

/// Decoded JSON whatever the status.
pub(crate) async fn decode_json(response: Response) -> SisResult<Value> {
    let status = response.status();
    let body = read_body(response).await?;
    serde_json::from_str(&body).map_err(|err| {
        SisError::MalformedResponse(format!("expected JSON (status {}): {err}", status.as_u16()))
    })
}

/// Status and text for the caller to interpret.
pub(crate) async fn into_raw(response: Response) -> SisResult<RawResponse> {
    let status = response.status().as_u16();
    let body = read_body(response).await?;
    Ok(RawResponse { status, body })
}

pub(crate) async fn read_body(response: Response) -> SisResult<String> {
    response.text().await.map_err(|err| InfraError::from(err).into_sis())
}
