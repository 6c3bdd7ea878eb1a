// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ECR authorization tokens via the AWS token-exchange service.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ecr::operation::get_authorization_token::GetAuthorizationTokenOutput;

use crate::error::{PullmanError, Result};
use crate::providers::{AuthToken, TokenProvider};

/// Fetches registry authorization tokens from ECR, scoped to one account id.
pub struct EcrTokenProvider {
    client: aws_sdk_ecr::Client,
    registry_id: String,
}

impl EcrTokenProvider {
    /// Create a provider backed by the default AWS credential chain
    pub async fn new(region: &str, registry_id: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: aws_sdk_ecr::Client::new(&sdk_config),
            registry_id: registry_id.to_string(),
        }
    }
}

#[async_trait]
impl TokenProvider for EcrTokenProvider {
    // registryIds is deprecated upstream but still honored; it pins the
    // token to the configured account instead of the caller's identity.
    #[allow(deprecated)]
    async fn fetch(&self) -> Result<AuthToken> {
        let response = self
            .client
            .get_authorization_token()
            .registry_ids(&self.registry_id)
            .send()
            .await
            .map_err(|e| PullmanError::Provider(e.to_string()))?;

        authorization_token(response)
    }
}

/// Extract the single token/endpoint pair from an ECR response
fn authorization_token(response: GetAuthorizationTokenOutput) -> Result<AuthToken> {
    let data = response
        .authorization_data()
        .first()
        .ok_or_else(|| PullmanError::Provider("ECR returned no authorization data".to_string()))?;

    let access_token = data.authorization_token().ok_or_else(|| {
        PullmanError::Provider("ECR authorization data is missing a token".to_string())
    })?;
    let endpoint = data.proxy_endpoint().ok_or_else(|| {
        PullmanError::Provider("ECR authorization data is missing a proxy endpoint".to_string())
    })?;

    Ok(AuthToken {
        access_token: access_token.to_string(),
        endpoint: endpoint.to_string(),
    })
}
