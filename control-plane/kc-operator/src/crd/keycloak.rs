use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[derive(Default, PartialEq)]
#[kube(
    group = "keycloak.org",
    version = "v1alpha1",
    kind = "Keycloak",
    plural = "keycloaks",
    namespaced,
    status = "KeycloakStatus",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakSpec {
    /// Workload variant ("RHSSO" selects the Red Hat SSO templates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Desired number of server replicas; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<i32>,
    /// Overrides the server image rendered by the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub migration: MigrationSpec,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct MigrationSpec {
    #[serde(default)]
    pub backups: MigrationBackupsSpec,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct MigrationBackupsSpec {
    /// Request a one-time backup before the server image changes.
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Image of the server currently running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_defaults_when_fields_omitted() {
        let spec: KeycloakSpec = serde_json::from_value(serde_json::json!({}))
            .expect("empty spec deserializes");
        assert_eq!(spec, KeycloakSpec::default());
        assert!(!spec.migration.backups.enabled);
    }

    #[test]
    fn spec_reads_migration_backups_flag() {
        let spec: KeycloakSpec = serde_json::from_value(serde_json::json!({
            "profile": "RHSSO",
            "instances": 3,
            "migration": { "backups": { "enabled": true } }
        }))
        .expect("spec deserializes");
        assert_eq!(spec.profile.as_deref(), Some("RHSSO"));
        assert_eq!(spec.instances, Some(3));
        assert!(spec.migration.backups.enabled);
    }
}
