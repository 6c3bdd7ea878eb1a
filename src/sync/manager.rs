// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The periodic credential refresh loop.

use std::time::Duration;

use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::constants::KUBE_SYSTEM_NAMESPACE;
use crate::error::Result;
use crate::providers::TokenProvider;
use crate::reconcilers::reconcile_namespace;
use crate::sync::secrets::{generate_secret, CredentialFormat};

/// One credential kind: where its token comes from and how it is packaged
pub struct SecretGenerator {
    pub provider: Box<dyn TokenProvider>,
    pub format: CredentialFormat,
    pub secret_name: String,
}

/// Drives the refresh loop: fetch a token per credential kind, materialize
/// the secret, and reconcile every namespace.
pub struct RefreshManager {
    client: Client,
    generators: Vec<SecretGenerator>,
    refresh_interval: Duration,
}

impl RefreshManager {
    pub fn new(
        client: Client,
        config: &Config,
        gcr: Box<dyn TokenProvider>,
        ecr: Box<dyn TokenProvider>,
    ) -> Self {
        // GCR before ECR, matching the historical credential ordering;
        // observable only in logs
        let generators = vec![
            SecretGenerator {
                provider: gcr,
                format: CredentialFormat::Dockercfg,
                secret_name: config.gcr_secret_name.clone(),
            },
            SecretGenerator {
                provider: ecr,
                format: CredentialFormat::DockerConfigJson,
                secret_name: config.aws_secret_name.clone(),
            },
        ];

        Self {
            client,
            generators,
            refresh_interval: Duration::from_secs(config.refresh_mins * 60),
        }
    }

    /// Run once immediately, then on every tick of the refresh interval.
    ///
    /// An initial-run failure is logged and the loop keeps going; a failure
    /// on any scheduled run propagates to the caller.
    pub async fn run(self) -> Result<()> {
        let mut ticks = tokio::time::interval(self.refresh_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately
        ticks.tick().await;
        if let Err(e) = self.run_once().await {
            error!("Initial credential refresh failed: {}", e);
        }

        loop {
            ticks.tick().await;
            info!("Refreshing credentials...");
            self.run_once().await?;
        }
    }

    /// One full reconciliation pass over both credential kinds.
    ///
    /// The first error aborts the entire run: a token fetch failure skips
    /// the remaining credential kind, and a failed namespace stops the
    /// iteration.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<()> {
        info!("Processing credentials...");

        for generator in &self.generators {
            // All writes happen after a successful fetch, so a provider
            // outage leaves every namespace untouched
            let token = generator.provider.fetch().await?;
            let secret = generate_secret(
                &token.access_token,
                &token.endpoint,
                generator.format,
                &generator.secret_name,
            );

            let namespaces: Api<Namespace> = Api::all(self.client.clone());
            let namespace_list = namespaces.list(&ListParams::default()).await?;

            for namespace in &namespace_list.items {
                let name = namespace.name_any();
                if name == KUBE_SYSTEM_NAMESPACE {
                    continue;
                }
                reconcile_namespace(&self.client, &name, &secret).await?;
            }

            info!("Finished processing secret: {}", generator.secret_name);
        }

        Ok(())
    }
}
