// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use clap::Parser;
use std::env;
use tracing::warn;

/// Keeps registry image-pull credentials fresh across all namespaces.
///
/// Parsed once at startup and passed by reference into constructors;
/// nothing reads process state after that.
#[derive(Parser, Debug, Clone)]
#[command(name = "pullman")]
pub struct Config {
    /// Use the built-in cluster service account for the Kubernetes client
    #[arg(
        long = "use-kubernetes-cluster-service",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub use_cluster_service: bool,

    /// Location of a kubeconfig file for access to the Kubernetes master
    #[arg(long = "kubecfg-file")]
    pub kubecfg_file: Option<String>,

    /// URL to reach the Kubernetes master, overrides the kubeconfig server address
    #[arg(long = "kube-master-url")]
    pub kube_master_url: Option<String>,

    /// Name of the ECR credential secret
    #[arg(long = "aws-secret-name", default_value = "awsecr-cred")]
    pub aws_secret_name: String,

    /// Name of the GCR credential secret
    #[arg(long = "gcr-secret-name", default_value = "gcr-secret")]
    pub gcr_secret_name: String,

    /// Default namespace; reconciliation itself always walks every namespace
    #[arg(long = "default-namespace", default_value = "default")]
    pub default_namespace: String,

    /// GCR registry endpoint written into the credential secret
    #[arg(long = "gcr-url", default_value = "https://gcr.io")]
    pub gcr_url: String,

    /// AWS region the ECR client talks to
    #[arg(long = "aws-region", default_value = "us-east-1")]
    pub aws_region: String,

    /// Minutes to wait between credential refreshes
    #[arg(long = "refresh-mins", default_value_t = 60)]
    pub refresh_mins: u64,

    /// AWS account id owning the ECR registry, taken from the `awsaccount` env variable
    #[arg(skip)]
    pub aws_account_id: String,
}

impl Config {
    /// Parse command line flags and apply environment overrides
    pub fn from_args() -> Self {
        let mut config = Self::parse();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.aws_account_id = env::var("awsaccount").unwrap_or_default();
        if self.aws_account_id.is_empty() {
            warn!("Missing awsaccount env variable, assuming GCR usage");
        }

        if let Ok(region) = env::var("awsregion") {
            if !region.is_empty() {
                self.aws_region = region;
            }
        }
    }
}
