use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;

use super::{labels, owner_ref};
use crate::crd::{BackupReason, Keycloak, KeycloakBackup, KeycloakBackupSpec};

/// One-time backup requested right before the server image changes.
///
/// The name is derived from the CR only, so repeated reconcile passes
/// request the same backup instead of piling up new ones. `namespace` is the
/// one the CR was resolved into by the caller.
pub fn migration_backup(
    cr: &Keycloak,
    prefix: &str,
    namespace: &str,
    from_image: Option<&str>,
    to_image: Option<&str>,
) -> KeycloakBackup {
    let name = cr.name_any();
    let instance_labels = if cr.labels().is_empty() {
        None
    } else {
        Some(cr.labels().clone())
    };
    KeycloakBackup {
        metadata: ObjectMeta {
            name: Some(format!("{}-{}", prefix, name)),
            namespace: Some(namespace.to_string()),
            labels: Some(labels("backup")),
            owner_references: owner_ref(cr),
            ..Default::default()
        },
        spec: KeycloakBackupSpec {
            keycloak_cr_name: name,
            instance_labels,
            reason: BackupReason::Migration,
            from_image: from_image.map(str::to_string),
            to_image: to_image.map(str::to_string),
            restore: false,
        },
    }
}
