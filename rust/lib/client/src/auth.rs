//! Password login against `POST /token`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ClientError;
use crate::session::Session;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges credentials for a bearer token.
///
/// Does not go through [`crate::ApiClient`]: the body is form-encoded and
/// no bearer header is sent.
pub struct Auth {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl Auth {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Log in and commit the issued token to the session.
    ///
    /// Both fields are sent exactly as typed. A username of only whitespace
    /// counts as empty.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("enter username and password"));
        }

        let url = format!("{}/token", self.base_url);
        debug!(%url, username, "login request");
        let resp = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            debug!(status, body = %body, "login rejected");
            return Err(ClientError::InvalidCredentials);
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("login response: {}", e)))?;
        self.session.set(&token.access_token)?;
        info!(username, "logged in");
        Ok(())
    }

    /// Forget the token locally. The server is not contacted.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        info!("logged out");
        Ok(())
    }
}
