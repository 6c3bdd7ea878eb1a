// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry token providers that normalize cloud credentials into one shape.

use async_trait::async_trait;

use crate::error::Result;

pub mod ecr;
pub mod gcr;

pub use ecr::EcrTokenProvider;
pub use gcr::GcrTokenProvider;

/// A short-lived registry authorization, produced fresh on every refresh run
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub access_token: String,
    pub endpoint: String,
}

/// Capability to fetch a registry bearer token.
///
/// Both registries return the same normalized shape so the refresh loop
/// stays provider-agnostic; validation differences live inside each
/// implementation.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch(&self) -> Result<AuthToken>;
}
