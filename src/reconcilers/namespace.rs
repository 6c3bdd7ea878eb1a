// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-namespace reconciliation of the credential secret and the default
//! service account's image-pull-secret reference.

use k8s_openapi::api::core::v1::{LocalObjectReference, Secret, ServiceAccount};
use kube::{api::PostParams, Api, Client, ResourceExt};
use tracing::{debug, info, instrument};

use crate::constants::DEFAULT_SERVICE_ACCOUNT;
use crate::error::Result;

/// Ensure the namespace carries the freshly materialized secret and that the
/// default service account references it.
///
/// Each step aborts this namespace on the first store error; the caller
/// decides what a failed namespace means for the rest of the run.
#[instrument(skip(client, secret), fields(secret = %secret.name_any()))]
pub async fn reconcile_namespace(client: &Client, namespace: &str, secret: &Secret) -> Result<()> {
    let secret_name = secret.name_any();
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    // Create the secret if it is missing, otherwise overwrite it with the
    // fresh payload
    match secrets.get(&secret_name).await {
        Ok(_) => {
            debug!("Updating secret {}/{}", namespace, secret_name);
            secrets
                .replace(&secret_name, &PostParams::default(), secret)
                .await?;
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Creating secret {}/{}", namespace, secret_name);
            secrets.create(&PostParams::default(), secret).await?;
        }
        Err(e) => return Err(e.into()),
    }

    // The default service account must already exist; a missing account is a
    // store error like any other
    let accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);
    let mut account = accounts.get(DEFAULT_SERVICE_ACCOUNT).await?;

    account.image_pull_secrets = Some(upsert_image_pull_secret(
        account.image_pull_secrets.take().unwrap_or_default(),
        &secret_name,
    ));

    accounts
        .replace(DEFAULT_SERVICE_ACCOUNT, &PostParams::default(), &account)
        .await?;

    Ok(())
}

/// Ensure the list carries exactly one reference with the given name.
///
/// An existing entry is replaced in place; otherwise a new reference is
/// appended. All other entries and their order are preserved.
pub fn upsert_image_pull_secret(
    mut references: Vec<LocalObjectReference>,
    name: &str,
) -> Vec<LocalObjectReference> {
    let reference = LocalObjectReference {
        name: name.to_string(),
    };

    match references
        .iter_mut()
        .find(|r| r.name == name)
    {
        Some(existing) => *existing = reference,
        None => references.push(reference),
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::secrets::{generate_secret, CredentialFormat};
    use crate::test_utils::{
        secret_json, server_error_json, service_account_json, MockService, RecordedRequest,
    };
    use crate::error::PullmanError;

    fn make_references(names: &[&str]) -> Vec<LocalObjectReference> {
        names
            .iter()
            .map(|name| LocalObjectReference {
                name: name.to_string(),
            })
            .collect()
    }

    fn reference_names(references: &[LocalObjectReference]) -> Vec<String> {
        references
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    fn gcr_secret() -> Secret {
        generate_secret(
            "fresh-token",
            "https://gcr.io",
            CredentialFormat::Dockercfg,
            "gcr-secret",
        )
    }

    fn service_account_puts(requests: &[RecordedRequest]) -> Vec<ServiceAccount> {
        requests
            .iter()
            .filter(|r| r.method == "PUT" && r.path.ends_with("/serviceaccounts/default"))
            .map(|r| serde_json::from_str(&r.body).unwrap())
            .collect()
    }

    #[test]
    fn test_upsert_appends_missing_reference() {
        let references = upsert_image_pull_secret(make_references(&["other-reg"]), "gcr-secret");

        assert_eq!(reference_names(&references), vec!["other-reg", "gcr-secret"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let references = upsert_image_pull_secret(
            make_references(&["other-reg", "gcr-secret", "third-reg"]),
            "gcr-secret",
        );

        assert_eq!(
            reference_names(&references),
            vec!["other-reg", "gcr-secret", "third-reg"]
        );
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let once = upsert_image_pull_secret(make_references(&["other-reg"]), "gcr-secret");
        let twice = upsert_image_pull_secret(once.clone(), "gcr-secret");

        assert_eq!(reference_names(&twice), reference_names(&once));
        assert_eq!(
            twice
                .iter()
                .filter(|r| r.name == "gcr-secret")
                .count(),
            1
        );
    }

    #[test]
    fn test_upsert_into_empty_list() {
        let references = upsert_image_pull_secret(Vec::new(), "gcr-secret");

        assert_eq!(reference_names(&references), vec!["gcr-secret"]);
    }

    #[tokio::test]
    async fn test_reconcile_creates_missing_secret_and_appends_reference() {
        // team-a has no secret yet and one unrelated image-pull-secret
        let mock = MockService::new()
            .on_post(
                "/api/v1/namespaces/team-a/secrets",
                201,
                &secret_json("team-a", "gcr-secret", "kubernetes.io/dockercfg"),
            )
            .on_get(
                "/api/v1/namespaces/team-a/serviceaccounts/default",
                200,
                &service_account_json("team-a", &["other-reg"]),
            )
            .on_put(
                "/api/v1/namespaces/team-a/serviceaccounts/default",
                200,
                &service_account_json("team-a", &["other-reg", "gcr-secret"]),
            );
        let client = mock.clone().into_client();

        reconcile_namespace(&client, "team-a", &gcr_secret())
            .await
            .unwrap();

        let requests = mock.recorded_requests();
        assert!(requests
            .iter()
            .any(|r| r.method == "POST" && r.path == "/api/v1/namespaces/team-a/secrets"));

        let puts = service_account_puts(&requests);
        assert_eq!(puts.len(), 1);
        assert_eq!(
            reference_names(puts[0].image_pull_secrets.as_deref().unwrap_or_default()),
            vec!["other-reg", "gcr-secret"]
        );
    }

    #[tokio::test]
    async fn test_reconcile_replaces_existing_secret_in_place() {
        // team-b already has the secret with a stale token and the reference
        let mock = MockService::new()
            .on_get(
                "/api/v1/namespaces/team-b/secrets/gcr-secret",
                200,
                &secret_json("team-b", "gcr-secret", "kubernetes.io/dockercfg"),
            )
            .on_put(
                "/api/v1/namespaces/team-b/secrets/gcr-secret",
                200,
                &secret_json("team-b", "gcr-secret", "kubernetes.io/dockercfg"),
            )
            .on_get(
                "/api/v1/namespaces/team-b/serviceaccounts/default",
                200,
                &service_account_json("team-b", &["gcr-secret"]),
            )
            .on_put(
                "/api/v1/namespaces/team-b/serviceaccounts/default",
                200,
                &service_account_json("team-b", &["gcr-secret"]),
            );
        let client = mock.clone().into_client();

        let fresh = gcr_secret();
        reconcile_namespace(&client, "team-b", &fresh).await.unwrap();

        let requests = mock.recorded_requests();

        // The secret was replaced, not re-created, and carries the new payload
        let secret_put = requests
            .iter()
            .find(|r| r.method == "PUT" && r.path == "/api/v1/namespaces/team-b/secrets/gcr-secret")
            .unwrap();
        let written: Secret = serde_json::from_str(&secret_put.body).unwrap();
        assert_eq!(written.data, fresh.data);
        assert_eq!(written.type_, fresh.type_);
        assert!(!requests.iter().any(|r| r.method == "POST"));

        // The reference list length is unchanged
        let puts = service_account_puts(&requests);
        assert_eq!(puts.len(), 1);
        assert_eq!(
            reference_names(puts[0].image_pull_secrets.as_deref().unwrap_or_default()),
            vec!["gcr-secret"]
        );
    }

    #[tokio::test]
    async fn test_reconcile_twice_does_not_grow_reference_list() {
        let mock = MockService::new()
            .on_get(
                "/api/v1/namespaces/team-b/secrets/gcr-secret",
                200,
                &secret_json("team-b", "gcr-secret", "kubernetes.io/dockercfg"),
            )
            .on_put(
                "/api/v1/namespaces/team-b/secrets/gcr-secret",
                200,
                &secret_json("team-b", "gcr-secret", "kubernetes.io/dockercfg"),
            )
            .on_get(
                "/api/v1/namespaces/team-b/serviceaccounts/default",
                200,
                &service_account_json("team-b", &["other-reg", "gcr-secret"]),
            )
            .on_put(
                "/api/v1/namespaces/team-b/serviceaccounts/default",
                200,
                &service_account_json("team-b", &["other-reg", "gcr-secret"]),
            );
        let client = mock.clone().into_client();

        let secret = gcr_secret();
        reconcile_namespace(&client, "team-b", &secret).await.unwrap();
        reconcile_namespace(&client, "team-b", &secret).await.unwrap();

        for put in service_account_puts(&mock.recorded_requests()) {
            let names = reference_names(put.image_pull_secrets.as_deref().unwrap_or_default());
            assert_eq!(names, vec!["other-reg", "gcr-secret"]);
        }
    }

    #[tokio::test]
    async fn test_reconcile_fails_when_default_service_account_missing() {
        // Secret creation succeeds but the service account lookup 404s
        let mock = MockService::new().on_post(
            "/api/v1/namespaces/team-a/secrets",
            201,
            &secret_json("team-a", "gcr-secret", "kubernetes.io/dockercfg"),
        );
        let client = mock.clone().into_client();

        let err = reconcile_namespace(&client, "team-a", &gcr_secret())
            .await
            .unwrap_err();

        assert!(matches!(err, PullmanError::Store(_)));
    }

    #[tokio::test]
    async fn test_reconcile_propagates_unexpected_secret_lookup_error() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/team-a/secrets/gcr-secret",
            500,
            &server_error_json(),
        );
        let client = mock.clone().into_client();

        let err = reconcile_namespace(&client, "team-a", &gcr_secret())
            .await
            .unwrap_err();

        assert!(matches!(err, PullmanError::Store(_)));
        // Nothing was written after the failed lookup
        assert!(mock.write_requests().is_empty());
    }
}
