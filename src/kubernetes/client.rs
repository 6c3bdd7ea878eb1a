// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation and kubeconfig utilities

use http::Uri;
use kube::{config::KubeConfigOptions, Client, Config as KConfig};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{PullmanError, Result};

/// Create the Kubernetes client from the loaded configuration.
///
/// In-cluster service account credentials by default; otherwise a kubeconfig
/// file (or the inferred local environment) with an optional master URL
/// override.
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<Client> {
    if config.use_cluster_service {
        debug!("Using in-cluster service account credentials");
        let client_config = KConfig::incluster().map_err(|e| {
            PullmanError::Kubeconfig(format!("Failed to load in-cluster config: {}", e))
        })?;
        return Client::try_from(client_config)
            .map_err(|e| PullmanError::Kubeconfig(format!("Failed to create client: {}", e)));
    }

    let client_config = match &config.kubecfg_file {
        Some(path) => client_config_from_file(path).await?,
        None => KConfig::infer()
            .await
            .map_err(|e| PullmanError::Kubeconfig(format!("Failed to infer config: {}", e)))?,
    };
    let client_config = apply_master_url(client_config, config.kube_master_url.as_deref())?;

    Client::try_from(client_config)
        .map_err(|e| PullmanError::Kubeconfig(format!("Failed to create client: {}", e)))
}

/// Create a client config from a kubeconfig file on disk
async fn client_config_from_file(path: &str) -> Result<KConfig> {
    use kube::config::Kubeconfig;

    let raw = std::fs::read_to_string(path).map_err(|e| {
        PullmanError::Kubeconfig(format!("Failed to read kubeconfig {}: {}", path, e))
    })?;

    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(&raw)
        .map_err(|e| PullmanError::Kubeconfig(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| PullmanError::Kubeconfig(format!("Failed to create config: {}", e)))
}

/// Override the server address when a master URL was configured
fn apply_master_url(mut client_config: KConfig, master_url: Option<&str>) -> Result<KConfig> {
    if let Some(url) = master_url {
        debug!(
            "Overriding cluster URL {} with {}",
            client_config.cluster_url, url
        );
        client_config.cluster_url = url
            .parse::<Uri>()
            .map_err(|e| PullmanError::Kubeconfig(format!("Invalid master URL {}: {}", url, e)))?;
    }

    Ok(client_config)
}
