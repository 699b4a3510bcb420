use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Secret, Service};
use tracing::trace;

use super::action::ManagedResource;
use super::migration::detector::primary_image;
use crate::model::{
    DATABASE_SECRET_NAME, KEYCLOAK_SERVICE_NAME, KEYCLOAK_WORKLOAD_NAME,
    POSTGRESQL_NAME, Profile,
};

/// Children of a Keycloak CR as last observed in the cluster.
///
/// Every field is `None` until the corresponding object exists, e.g. on the
/// first reconcile pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterState {
    pub keycloak_stateful_set: Option<StatefulSet>,
    pub keycloak_service: Option<Service>,
    pub postgresql_deployment: Option<Deployment>,
    pub database_secret: Option<Secret>,
}

impl ClusterState {
    /// Sort observed objects into their slots by kind and name; anything the
    /// operator does not own is ignored.
    pub fn from_observed<I>(children: I) -> Self
    where
        I: IntoIterator<Item = ManagedResource>,
    {
        let mut state = ClusterState::default();
        for child in children {
            match child {
                ManagedResource::StatefulSet(sts)
                    if sts.metadata.name.as_deref()
                        == Some(KEYCLOAK_WORKLOAD_NAME) =>
                {
                    state.keycloak_stateful_set = Some(sts);
                }
                ManagedResource::Service(svc)
                    if svc.metadata.name.as_deref()
                        == Some(KEYCLOAK_SERVICE_NAME) =>
                {
                    state.keycloak_service = Some(svc);
                }
                ManagedResource::Deployment(dep)
                    if dep.metadata.name.as_deref() == Some(POSTGRESQL_NAME) =>
                {
                    state.postgresql_deployment = Some(dep);
                }
                ManagedResource::Secret(secret)
                    if secret.metadata.name.as_deref()
                        == Some(DATABASE_SECRET_NAME) =>
                {
                    state.database_secret = Some(secret);
                }
                other => {
                    trace!(
                        kind = other.kind(),
                        name = ?other.name(),
                        "state: ignoring unowned child"
                    );
                }
            }
        }
        state
    }

    pub fn workload(&self) -> Option<&StatefulSet> {
        self.keycloak_stateful_set.as_ref()
    }

    /// Image of the running server, if the workload exists and is well formed.
    pub fn workload_image(&self, profile: Profile) -> Option<&str> {
        self.workload().and_then(|sts| primary_image(sts, profile))
    }

    /// Replicas the workload controller reports as running.
    pub fn observed_replicas(&self) -> i32 {
        self.workload()
            .and_then(|sts| sts.status.as_ref())
            .map(|s| s.replicas)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperatorConfig;
    use crate::crd::{Keycloak, KeycloakSpec};
    use crate::model::{
        keycloak_service, keycloak_stateful_set, postgresql_deployment,
    };
    use k8s_openapi::api::apps::v1::StatefulSetStatus;

    #[test]
    fn from_observed_slots_owned_children() {
        let cr = Keycloak::new("kc", KeycloakSpec::default());
        let cfg = OperatorConfig::default();
        let mut sts = keycloak_stateful_set(&cr, &cfg, None);
        sts.status = Some(StatefulSetStatus {
            replicas: 2,
            ..Default::default()
        });
        let mut stray = keycloak_service(&cr);
        stray.metadata.name = Some("unrelated".into());

        let state = ClusterState::from_observed(vec![
            ManagedResource::StatefulSet(sts),
            ManagedResource::Service(keycloak_service(&cr)),
            ManagedResource::Service(stray),
            ManagedResource::Deployment(postgresql_deployment(&cr, &cfg)),
        ]);

        assert!(state.keycloak_stateful_set.is_some());
        assert_eq!(
            state
                .keycloak_service
                .as_ref()
                .and_then(|s| s.metadata.name.as_deref()),
            Some("keycloak")
        );
        assert!(state.postgresql_deployment.is_some());
        assert!(state.database_secret.is_none());
        assert_eq!(state.observed_replicas(), 2);
        assert_eq!(
            state.workload_image(Profile::Keycloak),
            Some(cfg.workload_image(Profile::Keycloak))
        );
    }

    #[test]
    fn empty_state_has_no_workload() {
        let state = ClusterState::default();
        assert!(state.workload().is_none());
        assert_eq!(state.workload_image(Profile::Keycloak), None);
        assert_eq!(state.observed_replicas(), 0);
    }
}
