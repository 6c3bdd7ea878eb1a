// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PullmanError {
    #[error("Token provider error: {0}")]
    Provider(String),

    #[error("Kubernetes API error: {0}")]
    Store(#[from] kube::Error),

    #[error("Failed to build Kubernetes client: {0}")]
    Kubeconfig(String),
}

pub type Result<T> = std::result::Result<T, PullmanError>;
