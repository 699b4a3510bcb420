use k8s_openapi::api::apps::v1::{
    StatefulSet, StatefulSetSpec, StatefulSetStatus,
};
use kube::ResourceExt;
use tracing::{info, warn};

use super::detector::primary_image;
use crate::controller::action::{
    DesiredClusterState, ManagedResource, ResourceAction,
};
use crate::crd::Keycloak;
use crate::model::{Profile, migration_backup};

pub struct RewriteContext<'a> {
    pub cr: &'a Keycloak,
    /// CR namespace, or the operator's when the CR carries none.
    pub namespace: &'a str,
    pub profile: Profile,
    /// Image of the workload currently running, recorded on the backup.
    pub running_image: Option<&'a str>,
    pub backup_prefix: &'a str,
}

/// Make a detected migration safe: scale the workload update to zero and,
/// when the CR asks for it, request a backup after it.
///
/// Without a migration the actions are handed back as they came in.
pub fn rewrite(
    ctx: &RewriteContext<'_>,
    required: bool,
    mut actions: DesiredClusterState,
    matched: usize,
) -> DesiredClusterState {
    if !required {
        return actions;
    }

    let Some(ResourceAction::Update(ManagedResource::StatefulSet(sts))) =
        actions.get_mut(matched)
    else {
        warn!(
            matched,
            action = ?actions.get(matched).map(|a| a.describe()),
            "migration: matched action is not a workload update; skipping"
        );
        return actions;
    };
    let target_image = primary_image(sts, ctx.profile).map(str::to_string);
    scale_to_zero(sts);
    info!(
        name = %ctx.cr.name_any(),
        from = ?ctx.running_image,
        to = ?target_image,
        "migration: number of replicas decreased to 0"
    );

    if ctx.cr.spec.migration.backups.enabled {
        let backup = migration_backup(
            ctx.cr,
            ctx.backup_prefix,
            ctx.namespace,
            ctx.running_image,
            target_image.as_deref(),
        );
        info!(backup = %backup.name_any(), "migration: requesting backup");
        actions.push(ResourceAction::Create(ManagedResource::KeycloakBackup(
            backup,
        )));
    }

    actions
}

/// Drain every replica before the new image starts; both versions must never
/// share the database.
fn scale_to_zero(sts: &mut StatefulSet) {
    sts.spec
        .get_or_insert_with(StatefulSetSpec::default)
        .replicas = Some(0);
    sts.status
        .get_or_insert_with(StatefulSetStatus::default)
        .replicas = 0;
}
