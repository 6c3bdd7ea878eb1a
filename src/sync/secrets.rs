// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry credential secret materialization.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::constants::docker;

/// Credential file format written into the secret payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFormat {
    /// Legacy single-object dockercfg, one entry keyed by endpoint
    Dockercfg,
    /// Docker config json with the entry nested under `auths`
    DockerConfigJson,
}

/// One entry of a legacy dockercfg file.
///
/// Field order is part of the on-disk contract the container runtime
/// parses; keep it as declared.
#[derive(Serialize, Deserialize)]
pub struct DockercfgEntry {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Top-level docker config json document
#[derive(Serialize, Deserialize)]
pub struct DockerConfigJson {
    pub auths: BTreeMap<String, DockerConfigAuth>,
}

#[derive(Serialize, Deserialize)]
pub struct DockerConfigAuth {
    pub auth: String,
    pub email: String,
}

/// Build the credential secret for one registry.
///
/// Pure and total: the payload encodings cannot fail for any token/endpoint
/// pair.
pub fn generate_secret(
    token: &str,
    endpoint: &str,
    format: CredentialFormat,
    name: &str,
) -> Secret {
    let (key, type_, payload) = match format {
        CredentialFormat::Dockercfg => (
            docker::CFG_KEY,
            docker::CFG_TYPE,
            dockercfg_payload(token, endpoint),
        ),
        CredentialFormat::DockerConfigJson => (
            docker::CONFIG_JSON_KEY,
            docker::CONFIG_JSON_TYPE,
            docker_config_json_payload(token, endpoint),
        ),
    };

    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(key.to_string(), ByteString(payload))])),
        type_: Some(type_.to_string()),
        ..Default::default()
    }
}

fn dockercfg_payload(token: &str, endpoint: &str) -> Vec<u8> {
    let cfg = BTreeMap::from([(
        endpoint.to_string(),
        DockercfgEntry {
            username: docker::USERNAME.to_string(),
            password: token.to_string(),
            email: docker::EMAIL.to_string(),
        },
    )]);

    serde_json::to_vec(&cfg).expect("dockercfg payload serialization is infallible")
}

fn docker_config_json_payload(token: &str, endpoint: &str) -> Vec<u8> {
    let cfg = DockerConfigJson {
        auths: BTreeMap::from([(
            endpoint.to_string(),
            DockerConfigAuth {
                auth: token.to_string(),
                email: docker::EMAIL.to_string(),
            },
        )]),
    };

    serde_json::to_vec(&cfg).expect("docker config json payload serialization is infallible")
}
