use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec,
    Secret, SecretKeySelector, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    LabelSelector, ObjectMeta,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;

use super::{
    KEYCLOAK_SERVICE_NAME, KEYCLOAK_WORKLOAD_NAME, POSTGRESQL_NAME, Profile,
    labels, owner_ref,
};
use crate::config::OperatorConfig;
use crate::crd::Keycloak;

const HTTP_PORT: i32 = 8080;
const HTTPS_PORT: i32 = 8443;

/// Render the workload for whichever profile the CR (or config) selects.
pub fn workload_stateful_set(
    cr: &Keycloak,
    cfg: &OperatorConfig,
    db_secret: Option<&Secret>,
) -> StatefulSet {
    match Profile::from_cr(cr).unwrap_or_else(|| cfg.default_profile()) {
        Profile::Keycloak => keycloak_stateful_set(cr, cfg, db_secret),
        Profile::Rhsso => rhsso_stateful_set(cr, cfg, db_secret),
    }
}

pub fn keycloak_stateful_set(
    cr: &Keycloak,
    cfg: &OperatorConfig,
    db_secret: Option<&Secret>,
) -> StatefulSet {
    let mut env = vec![
        EnvVar {
            name: "DB_VENDOR".to_string(),
            value: Some("POSTGRES".to_string()),
            ..Default::default()
        },
        EnvVar {
            name: "DB_ADDR".to_string(),
            value: Some(POSTGRESQL_NAME.to_string()),
            ..Default::default()
        },
    ];
    env.extend(database_env(db_secret, "DB_USER", "DB_PASSWORD"));
    render_stateful_set(cr, cfg, Profile::Keycloak, env)
}

pub fn rhsso_stateful_set(
    cr: &Keycloak,
    cfg: &OperatorConfig,
    db_secret: Option<&Secret>,
) -> StatefulSet {
    let mut env = vec![
        EnvVar {
            name: "DB_SERVICE_PREFIX_MAPPING".to_string(),
            value: Some(format!("{}=DB", POSTGRESQL_NAME)),
            ..Default::default()
        },
        EnvVar {
            name: "DB_DATABASE".to_string(),
            value: Some("root".to_string()),
            ..Default::default()
        },
    ];
    env.extend(database_env(db_secret, "DB_USERNAME", "DB_PASSWORD"));
    render_stateful_set(cr, cfg, Profile::Rhsso, env)
}

pub fn keycloak_service(cr: &Keycloak) -> Service {
    let lbls = labels(KEYCLOAK_WORKLOAD_NAME);
    Service {
        metadata: ObjectMeta {
            name: Some(KEYCLOAK_SERVICE_NAME.to_string()),
            namespace: cr.namespace(),
            labels: Some(lbls.clone()),
            owner_references: owner_ref(cr),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(lbls),
            ports: Some(vec![ServicePort {
                name: Some(KEYCLOAK_WORKLOAD_NAME.to_string()),
                port: HTTPS_PORT,
                target_port: Some(IntOrString::Int(HTTPS_PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn database_env(
    db_secret: Option<&Secret>,
    user_var: &str,
    password_var: &str,
) -> Vec<EnvVar> {
    let Some(secret_name) = db_secret.and_then(|s| s.metadata.name.clone())
    else {
        return vec![];
    };
    let from_secret = |var: &str, key: &str| EnvVar {
        name: var.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.clone(),
                key: key.to_string(),
                optional: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    };
    vec![
        from_secret(user_var, "POSTGRES_USERNAME"),
        from_secret(password_var, "POSTGRES_PASSWORD"),
    ]
}

fn render_stateful_set(
    cr: &Keycloak,
    cfg: &OperatorConfig,
    profile: Profile,
    env: Vec<EnvVar>,
) -> StatefulSet {
    let lbls = labels(KEYCLOAK_WORKLOAD_NAME);
    let selector = LabelSelector {
        match_labels: Some(lbls.clone()),
        ..Default::default()
    };
    let image = cr
        .spec
        .image
        .clone()
        .unwrap_or_else(|| cfg.workload_image(profile).to_string());

    let container = Container {
        name: profile.container_name().to_string(),
        image: Some(image),
        ports: Some(vec![
            ContainerPort {
                container_port: HTTP_PORT,
                protocol: Some("TCP".to_string()),
                ..Default::default()
            },
            ContainerPort {
                container_port: HTTPS_PORT,
                protocol: Some("TCP".to_string()),
                ..Default::default()
            },
        ]),
        env: Some(env),
        ..Default::default()
    };

    StatefulSet {
        metadata: ObjectMeta {
            name: Some(KEYCLOAK_WORKLOAD_NAME.to_string()),
            namespace: cr.namespace(),
            labels: Some(lbls.clone()),
            owner_references: owner_ref(cr),
            ..Default::default()
        },
        spec: Some(StatefulSetSpec {
            replicas: Some(cr.spec.instances.unwrap_or(1)),
            selector,
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    name: Some(KEYCLOAK_WORKLOAD_NAME.to_string()),
                    labels: Some(lbls),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::KeycloakSpec;
    use crate::model::{
        DEFAULT_KEYCLOAK_IMAGE, DEFAULT_RHSSO_IMAGE, database_secret,
    };

    fn container(sts: &StatefulSet) -> &Container {
        let pod = sts.spec.as_ref().unwrap().template.spec.as_ref().unwrap();
        &pod.containers[0]
    }

    #[test]
    fn keycloak_profile_renders_default_image() {
        let cr = Keycloak::new("kc", KeycloakSpec::default());
        let sts = keycloak_stateful_set(&cr, &OperatorConfig::default(), None);
        assert_eq!(sts.metadata.name.as_deref(), Some("keycloak"));
        assert_eq!(sts.spec.as_ref().unwrap().replicas, Some(1));
        assert_eq!(container(&sts).name, "keycloak");
        assert_eq!(
            container(&sts).image.as_deref(),
            Some(DEFAULT_KEYCLOAK_IMAGE)
        );
        assert!(sts.status.is_none());
    }

    #[test]
    fn workload_follows_cr_profile_then_config() {
        let mut cr = Keycloak::new("kc", KeycloakSpec::default());
        let cfg = OperatorConfig {
            profile: "rhsso".into(),
            ..Default::default()
        };
        let sts = workload_stateful_set(&cr, &cfg, None);
        assert_eq!(container(&sts).name, "sso");
        assert_eq!(container(&sts).image.as_deref(), Some(DEFAULT_RHSSO_IMAGE));

        cr.spec.profile = Some("keycloak".into());
        let sts = workload_stateful_set(&cr, &cfg, None);
        assert_eq!(container(&sts).name, "keycloak");
    }

    #[test]
    fn cr_image_and_instances_override_defaults() {
        let mut cr = Keycloak::new("kc", KeycloakSpec::default());
        cr.spec.image = Some("quay.io/keycloak/keycloak:10.0.0".into());
        cr.spec.instances = Some(3);
        let sts = rhsso_stateful_set(&cr, &OperatorConfig::default(), None);
        assert_eq!(sts.spec.as_ref().unwrap().replicas, Some(3));
        assert_eq!(
            container(&sts).image.as_deref(),
            Some("quay.io/keycloak/keycloak:10.0.0")
        );
    }

    #[test]
    fn database_secret_wires_credentials() {
        let cr = Keycloak::new("kc", KeycloakSpec::default());
        let secret = database_secret(&cr);
        let sts = keycloak_stateful_set(
            &cr,
            &OperatorConfig::default(),
            Some(&secret),
        );
        let env = container(&sts).env.as_ref().unwrap();
        let user = env.iter().find(|e| e.name == "DB_USER").expect("DB_USER");
        let sel = user
            .value_from
            .as_ref()
            .and_then(|v| v.secret_key_ref.as_ref())
            .expect("secret ref");
        assert_eq!(sel.name, "keycloak-db-secret");
        assert_eq!(sel.key, "POSTGRES_USERNAME");
    }
}
