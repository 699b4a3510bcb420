//! Desired-state bodies for the resources a Keycloak CR owns.
//!
//! The reconciler diffs these against the observed cluster and hands the
//! resulting actions to the migration gate.

mod backup;
mod keycloak;
mod postgresql;

pub use backup::migration_backup;
pub use keycloak::{
    keycloak_service, keycloak_stateful_set, rhsso_stateful_set,
    workload_stateful_set,
};
pub use postgresql::{database_secret, postgresql_deployment};

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};

use crate::crd::Keycloak;

pub const DEFAULT_KEYCLOAK_IMAGE: &str = "quay.io/keycloak/keycloak:9.0.2";
pub const DEFAULT_RHSSO_IMAGE: &str =
    "registry.redhat.io/rh-sso-7/sso74-openshift-rhel8:7.4";
pub const DEFAULT_POSTGRESQL_IMAGE: &str = "postgres:11.5";

pub const APPLICATION_NAME: &str = "keycloak";
pub const KEYCLOAK_WORKLOAD_NAME: &str = "keycloak";
pub const KEYCLOAK_SERVICE_NAME: &str = "keycloak";
pub const POSTGRESQL_NAME: &str = "keycloak-postgresql";
pub const DATABASE_SECRET_NAME: &str = "keycloak-db-secret";

/// Template family the operator renders for a Keycloak CR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Profile {
    #[default]
    Keycloak,
    Rhsso,
}

impl Profile {
    /// Unknown or empty names resolve to the community Keycloak profile.
    pub fn from_name(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "rhsso" | "rh-sso" => Profile::Rhsso,
            _ => Profile::Keycloak,
        }
    }

    pub fn from_cr(cr: &Keycloak) -> Option<Self> {
        cr.spec
            .profile
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(Profile::from_name)
    }

    /// Name of the container whose image identifies the running version.
    pub fn container_name(&self) -> &'static str {
        match self {
            Profile::Keycloak => "keycloak",
            Profile::Rhsso => "sso",
        }
    }

    /// Both profiles render the server as `StatefulSet/keycloak`; only the
    /// container name differs, so the identity does not depend on `self`.
    pub fn workload(&self) -> WorkloadIdentity {
        WorkloadIdentity {
            kind: "StatefulSet",
            name: KEYCLOAK_WORKLOAD_NAME,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Keycloak => write!(f, "keycloak"),
            Profile::Rhsso => write!(f, "RHSSO"),
        }
    }
}

/// Kind + name of the workload controller resource for a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkloadIdentity {
    pub kind: &'static str,
    pub name: &'static str,
}

impl std::fmt::Display for WorkloadIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

fn labels(component: &str) -> BTreeMap<String, String> {
    let mut lbls = BTreeMap::new();
    lbls.insert("app".to_string(), APPLICATION_NAME.to_string());
    lbls.insert("component".to_string(), component.to_string());
    lbls
}

fn owner_ref(cr: &Keycloak) -> Option<Vec<OwnerReference>> {
    cr.meta().uid.as_ref().map(|uid| {
        vec![OwnerReference {
            api_version: Keycloak::api_version(&()).to_string(),
            kind: Keycloak::kind(&()).to_string(),
            name: cr.name_any(),
            uid: uid.clone(),
            controller: Some(true),
            block_owner_deletion: None,
        }]
    })
}
