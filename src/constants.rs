// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Namespace that credential reconciliation never touches
pub const KUBE_SYSTEM_NAMESPACE: &str = "kube-system";

/// Service account that receives the image-pull-secret references
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// OAuth2 scope requested for GCR access tokens
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Well-known data keys and type tags for registry credential secrets
pub mod docker {
    /// Data key and secret type for the legacy dockercfg format
    pub const CFG_KEY: &str = ".dockercfg";
    pub const CFG_TYPE: &str = "kubernetes.io/dockercfg";
    /// Data key and secret type for the docker config json format
    pub const CONFIG_JSON_KEY: &str = ".dockerconfigjson";
    pub const CONFIG_JSON_TYPE: &str = "kubernetes.io/dockerconfigjson";
    /// Fixed username understood by registries that accept OAuth2 access tokens
    pub const USERNAME: &str = "oauth2accesstoken";
    pub const EMAIL: &str = "none";
}
