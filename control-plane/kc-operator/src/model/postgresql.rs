use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy,
};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec,
    Secret, SecretKeySelector,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    LabelSelector, ObjectMeta,
};
use kube::ResourceExt;
use rand::{Rng, distr::Alphanumeric};

use super::{DATABASE_SECRET_NAME, POSTGRESQL_NAME, labels, owner_ref};
use crate::config::OperatorConfig;
use crate::crd::Keycloak;

const POSTGRESQL_PORT: i32 = 5432;

/// Credentials for the bundled database. The password is random, so only
/// call this when the secret does not exist yet.
pub fn database_secret(cr: &Keycloak) -> Secret {
    let password: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    let mut data = BTreeMap::new();
    data.insert("POSTGRES_USERNAME".to_string(), "keycloak".to_string());
    data.insert("POSTGRES_PASSWORD".to_string(), password);
    data.insert("POSTGRES_DATABASE".to_string(), "root".to_string());
    data.insert(
        "POSTGRES_EXTERNAL_PORT".to_string(),
        POSTGRESQL_PORT.to_string(),
    );
    Secret {
        metadata: ObjectMeta {
            name: Some(DATABASE_SECRET_NAME.to_string()),
            namespace: cr.namespace(),
            labels: Some(labels("database")),
            owner_references: owner_ref(cr),
            ..Default::default()
        },
        string_data: Some(data),
        ..Default::default()
    }
}

pub fn postgresql_deployment(
    cr: &Keycloak,
    cfg: &OperatorConfig,
) -> Deployment {
    let lbls = labels("database");
    let from_secret = |var: &str, key: &str| EnvVar {
        name: var.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: DATABASE_SECRET_NAME.to_string(),
                key: key.to_string(),
                optional: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    Deployment {
        metadata: ObjectMeta {
            name: Some(POSTGRESQL_NAME.to_string()),
            namespace: cr.namespace(),
            labels: Some(lbls.clone()),
            owner_references: owner_ref(cr),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(lbls.clone()),
                ..Default::default()
            },
            // single writer on the data volume
            strategy: Some(DeploymentStrategy {
                type_: Some("Recreate".to_string()),
                ..Default::default()
            }),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(lbls),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: POSTGRESQL_NAME.to_string(),
                        image: Some(cfg.postgresql_image.clone()),
                        ports: Some(vec![ContainerPort {
                            container_port: POSTGRESQL_PORT,
                            ..Default::default()
                        }]),
                        env: Some(vec![
                            from_secret("POSTGRES_USER", "POSTGRES_USERNAME"),
                            from_secret(
                                "POSTGRES_PASSWORD",
                                "POSTGRES_PASSWORD",
                            ),
                            from_secret("POSTGRES_DB", "POSTGRES_DATABASE"),
                        ]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
