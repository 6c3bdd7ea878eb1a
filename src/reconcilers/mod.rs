// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-namespace reconciliation of credential secrets.

pub mod namespace;

pub use namespace::{reconcile_namespace, upsert_image_pull_secret};
