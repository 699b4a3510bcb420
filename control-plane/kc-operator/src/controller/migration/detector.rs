use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::Container;
use tracing::debug;

use super::MigrationError;
use crate::controller::action::ResourceAction;
use crate::model::{Profile, WorkloadIdentity};

/// Container carrying the server image: the one named after the profile,
/// else the first one.
pub fn primary_container(
    sts: &StatefulSet,
    profile: Profile,
) -> Option<&Container> {
    let containers = &sts.spec.as_ref()?.template.spec.as_ref()?.containers;
    containers
        .iter()
        .find(|c| c.name == profile.container_name())
        .or_else(|| containers.first())
}

pub fn primary_image(sts: &StatefulSet, profile: Profile) -> Option<&str> {
    primary_container(sts, profile)?.image.as_deref()
}

/// Index of the single update action targeting the workload.
pub fn find_workload_update(
    actions: &[ResourceAction],
    workload: WorkloadIdentity,
) -> Result<Option<usize>, MigrationError> {
    let mut matches = actions.iter().enumerate().filter(|(_, a)| {
        matches!(a, ResourceAction::Update(_))
            && a.kind() == workload.kind
            && a.name() == Some(workload.name)
    });
    let Some((first, _)) = matches.next() else {
        return Ok(None);
    };
    let extra = matches.count();
    if extra > 0 {
        return Err(MigrationError::AmbiguousWorkload {
            workload: workload.to_string(),
            count: extra + 1,
        });
    }
    Ok(Some(first))
}

/// True when the running image differs from the one about to be applied.
///
/// Missing workloads or bodies without a resolvable image never migrate.
pub fn needs_migration(
    current: Option<&StatefulSet>,
    desired: Option<&StatefulSet>,
    profile: Profile,
) -> bool {
    let (Some(current), Some(desired)) = (current, desired) else {
        return false;
    };
    match (primary_image(current, profile), primary_image(desired, profile)) {
        (Some(running), Some(target)) => running != target,
        (running, target) => {
            debug!(
                ?running,
                ?target,
                "migration: image not resolvable; skipping"
            );
            false
        }
    }
}
