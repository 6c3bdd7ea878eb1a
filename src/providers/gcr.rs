// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! GCR access tokens via Google application-default credentials.

use async_trait::async_trait;
use gcp_auth::TokenProvider as _;

use crate::constants::CLOUD_PLATFORM_SCOPE;
use crate::error::{PullmanError, Result};
use crate::providers::{AuthToken, TokenProvider};

/// Fetches OAuth2 access tokens for GCR.
///
/// The endpoint is the configured registry URL, not derived from the token.
pub struct GcrTokenProvider {
    endpoint: String,
}

impl GcrTokenProvider {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl TokenProvider for GcrTokenProvider {
    async fn fetch(&self) -> Result<AuthToken> {
        // Resolved per fetch so credential rotation on disk is picked up
        let provider = gcp_auth::provider().await.map_err(|e| {
            PullmanError::Provider(format!("failed to resolve Google credentials: {}", e))
        })?;

        let token = provider
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| {
                PullmanError::Provider(format!("failed to fetch Google access token: {}", e))
            })?;

        if token.has_expired() {
            return Err(PullmanError::Provider(
                "Google access token is already expired".to_string(),
            ));
        }

        Ok(AuthToken {
            access_token: token.as_str().to_string(),
            endpoint: self.endpoint.clone(),
        })
    }
}
