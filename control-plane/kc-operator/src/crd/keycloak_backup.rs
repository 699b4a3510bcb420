use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request for the backup subsystem to snapshot the database behind a
/// Keycloak instance. The operator only declares it; the backup controller
/// runs it.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[derive(Default, PartialEq)]
#[kube(
    group = "keycloak.org",
    version = "v1alpha1",
    kind = "KeycloakBackup",
    plural = "keycloakbackups",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakBackupSpec {
    /// Name of the Keycloak CR whose database is backed up.
    pub keycloak_cr_name: String,
    /// Labels selecting the Keycloak instance (copied from the CR).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub reason: BackupReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_image: Option<String>,
    #[serde(default)]
    pub restore: bool,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, JsonSchema)]
#[derive(Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum BackupReason {
    #[default]
    Manual,
    Migration,
}
