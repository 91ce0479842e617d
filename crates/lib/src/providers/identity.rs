//! # Identity Provider Gateway
//!
//! Validates bearer tokens against the external identity service. The
//! service owns session handling entirely; this gateway only asks
//! "whose token is this" and returns the user id. Role resolution is a
//! separate store lookup.

use crate::errors::RagError;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct IdentityUser {
    id: String,
}

/// A client for the identity service's token-introspection endpoint.
#[derive(Clone, Debug)]
pub struct IdentityProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl IdentityProvider {
    /// Creates a new `IdentityProvider` for the auth service at `api_url`.
    pub fn new(api_url: String, api_key: String) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Resolves a bearer token to the id of the user it belongs to.
    ///
    /// Any rejection by the identity service (expired, malformed, or
    /// revoked token) surfaces as [`RagError::IdentityApi`].
    pub async fn user_id_for_token(&self, token: &str) -> Result<String, RagError> {
        let response = self
            .client
            .get(format!("{}/user", self.api_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(RagError::IdentityRequest)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RagError::IdentityApi { status, message });
        }

        let user: IdentityUser = response
            .json()
            .await
            .map_err(RagError::IdentityDeserialization)?;
        Ok(user.id)
    }
}
