// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::info;

use pullman::config::Config;
use pullman::kubernetes::create_client;
use pullman::providers::{EcrTokenProvider, GcrTokenProvider};
use pullman::sync::RefreshManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting up...");

    // Load configuration
    let config = Config::from_args();
    info!("Using AWS account: {}", config.aws_account_id);
    info!("Using AWS region: {}", config.aws_region);
    info!("Refresh interval (minutes): {}", config.refresh_mins);

    // Create Kubernetes client
    let client = create_client(&config).await?;
    info!("Connected to Kubernetes cluster");

    // Create the token providers for both registries
    let gcr = GcrTokenProvider::new(&config.gcr_url);
    let ecr = EcrTokenProvider::new(&config.aws_region, &config.aws_account_id).await;

    // Run the refresh loop forever; an error on a scheduled run is fatal
    let manager = RefreshManager::new(client, &config, Box::new(gcr), Box::new(ecr));
    manager.run().await?;

    Ok(())
}
