// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Credential materialization and the periodic refresh loop.

pub mod manager;
pub mod secrets;

pub use manager::{RefreshManager, SecretGenerator};
pub use secrets::{generate_secret, CredentialFormat};
