//! Reqwest-backed identity provider adapter.
//!
//! Exchanges an access credential for the account id with a single
//! `GET <endpoint>?access_token=<credential>`. The client carries an explicit
//! timeout so a slow provider fails the turn instead of hanging it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credential, UserId};

const DEFAULT_USER_AGENT: &str = "campus-assistant-identity/0.1";

/// Default profile endpoint of the voice platform's account service.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://api.amazon.com/user/profile";

#[derive(Debug, Deserialize)]
struct ProfileDto {
    user_id: String,
}

/// Identity provider calling one HTTP profile endpoint.
pub struct HttpIdentityProvider {
    client: Client,
    endpoint: Url,
}

impl HttpIdentityProvider {
    /// Build an adapter whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint the adapter queries.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn lookup(&self, credential: &Credential) -> Result<UserId, IdentityProviderError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("access_token", credential.expose())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_user_id(body.as_ref())
    }
}

fn parse_user_id(body: &[u8]) -> Result<UserId, IdentityProviderError> {
    let profile: ProfileDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid profile payload: {error}"))
    })?;
    UserId::new(profile.user_id).map_err(|error| IdentityProviderError::decode(error.to_string()))
}

// Transport errors carry reqwest's message, which includes the URL and so
// the credential; only the error class is kept.
fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout("request timed out")
    } else if error.is_connect() {
        IdentityProviderError::transport("connection failed")
    } else if error.is_decode() || error.is_body() {
        IdentityProviderError::transport("response body could not be read")
    } else {
        IdentityProviderError::transport("request failed")
    }
}

fn map_status_error(status: StatusCode) -> IdentityProviderError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(format!("status {}", status.as_u16()))
        }
        _ if status.is_client_error() => IdentityProviderError::rejected(status.as_u16()),
        _ => IdentityProviderError::transport(format!("status {}", status.as_u16())),
    }
}
