//! HTTP client for the authorization server's token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use leadforge_core::{AuthServerClient, TokenGrant};
use leadforge_domain::{AuthConfig, LeadForgeError, Result};
use serde::Deserialize;
use tracing::debug;

use crate::errors::InfraError;

const TOKEN_REQUEST_TIMEOUT_SECS: u64 = 30;

/// OAuth2 token-endpoint client for refresh and authorization-code grants.
pub struct OAuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

/// Token-endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl OAuthClient {
    pub fn new(config: AuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(TOKEN_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(InfraError::from)?;
        Ok(Self { http, config })
    }

    async fn request_grant(&self, form: &[(&str, &str)]) -> Result<TokenGrant> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| LeadForgeError::TokenRefresh(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LeadForgeError::TokenRefresh(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| LeadForgeError::TokenRefresh(format!("malformed token response: {e}")))?;

        debug!(
            has_refresh_token = token.refresh_token.is_some(),
            expires_in = ?token.expires_in,
            "token grant received"
        );

        Ok(TokenGrant {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token.expires_in.map(|s| Utc::now() + chrono::Duration::seconds(s)),
        })
    }
}

#[async_trait]
impl AuthServerClient for OAuthClient {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        self.request_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ])
        .await
    }

    async fn exchange_authorization_code(&self, code: &str) -> Result<TokenGrant> {
        self.request_grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ])
        .await
    }
}
