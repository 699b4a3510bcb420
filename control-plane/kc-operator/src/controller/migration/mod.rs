//! Migration gate: turns a server image change into a scale-to-zero update,
//! optionally followed by a backup request.
//!
//! Runs between the diff step and action execution. It only inspects the
//! workload update; every other action passes through in order.

pub mod detector;
pub mod rewriter;

use kube::ResourceExt;
use tracing::{debug, instrument};

use crate::config::OperatorConfig;
use crate::controller::action::DesiredClusterState;
use crate::controller::state::ClusterState;
use crate::crd::Keycloak;
use crate::model::Profile;

use detector::{find_workload_update, needs_migration};
use rewriter::{RewriteContext, rewrite};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("{count} update actions target {workload}; expected at most one")]
    AmbiguousWorkload { workload: String, count: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MigrationOutcome {
    pub required: bool,
    pub actions: DesiredClusterState,
}

pub trait Migrator {
    fn migrate(
        &self,
        cr: &Keycloak,
        current: &ClusterState,
        desired: DesiredClusterState,
    ) -> Result<DesiredClusterState, MigrationError>;
}

/// Stateless gate; cheap to clone and safe to share across reconciles.
#[derive(Clone, Debug)]
pub struct DefaultMigrator {
    default_profile: Profile,
    namespace: String,
    backup_prefix: String,
}

impl Default for DefaultMigrator {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultMigrator {
    pub fn new() -> Self {
        Self::from_config(&OperatorConfig::default())
    }

    pub fn from_config(cfg: &OperatorConfig) -> Self {
        Self {
            default_profile: cfg.default_profile(),
            namespace: cfg.k8s_namespace.clone(),
            backup_prefix: cfg.migration.backup_prefix.clone(),
        }
    }

    /// Profile named by the CR, else the operator default.
    pub fn profile_for(&self, cr: &Keycloak) -> Profile {
        Profile::from_cr(cr).unwrap_or(self.default_profile)
    }

    /// Namespace of the CR, else the operator namespace.
    pub fn namespace_for(&self, cr: &Keycloak) -> String {
        cr.namespace().unwrap_or_else(|| self.namespace.clone())
    }

    #[instrument(skip_all, fields(ns = %self.namespace_for(cr), name = %cr.name_any()))]
    pub fn plan(
        &self,
        cr: &Keycloak,
        current: &ClusterState,
        desired: DesiredClusterState,
    ) -> Result<MigrationOutcome, MigrationError> {
        let profile = self.profile_for(cr);
        let Some(matched) = find_workload_update(&desired, profile.workload())?
        else {
            debug!(%profile, "migration: no workload update in desired state");
            return Ok(MigrationOutcome {
                required: false,
                actions: desired,
            });
        };

        let target = desired[matched]
            .resource()
            .and_then(|r| r.as_stateful_set());
        let required = needs_migration(current.workload(), target, profile);
        debug!(
            %profile,
            required,
            observed_replicas = current.observed_replicas(),
            "migration: evaluated workload update"
        );

        let namespace = self.namespace_for(cr);
        let ctx = RewriteContext {
            cr,
            namespace: &namespace,
            profile,
            running_image: current.workload_image(profile),
            backup_prefix: &self.backup_prefix,
        };
        let actions = rewrite(&ctx, required, desired, matched);
        Ok(MigrationOutcome { required, actions })
    }
}

impl Migrator for DefaultMigrator {
    fn migrate(
        &self,
        cr: &Keycloak,
        current: &ClusterState,
        desired: DesiredClusterState,
    ) -> Result<DesiredClusterState, MigrationError> {
        self.plan(cr, current, desired).map(|o| o.actions)
    }
}
