use envconfig::Envconfig;

use crate::model::{
    DEFAULT_KEYCLOAK_IMAGE, DEFAULT_POSTGRESQL_IMAGE, DEFAULT_RHSSO_IMAGE,
    Profile,
};

#[derive(Envconfig, Clone, Debug)]
pub struct OperatorConfig {
    /// Profile used when a Keycloak CR does not name one.
    /// Env: KC_OPERATOR_PROFILE (keycloak | rhsso)
    #[envconfig(from = "KC_OPERATOR_PROFILE", default = "keycloak")]
    pub profile: String,

    /// Namespace assumed for a CR whose metadata carries none.
    /// Env: KC_OPERATOR_NAMESPACE
    #[envconfig(from = "KC_OPERATOR_NAMESPACE", default = "default")]
    pub k8s_namespace: String,

    /// Image override for the community Keycloak workload
    /// Env: KC_OPERATOR_KEYCLOAK_IMAGE
    #[envconfig(from = "KC_OPERATOR_KEYCLOAK_IMAGE")]
    pub keycloak_image: Option<String>,

    /// Image override for the RH-SSO workload
    /// Env: KC_OPERATOR_RHSSO_IMAGE
    #[envconfig(from = "KC_OPERATOR_RHSSO_IMAGE")]
    pub rhsso_image: Option<String>,

    #[envconfig(
        from = "KC_OPERATOR_POSTGRESQL_IMAGE",
        default = "postgres:11.5"
    )]
    pub postgresql_image: String,

    #[envconfig(nested)]
    pub migration: MigrationConfig,
}

#[derive(Envconfig, Clone, Debug)]
pub struct MigrationConfig {
    /// Name prefix for the one-time backup requested ahead of a migration.
    /// Env: KC_OPERATOR_MIGRATION_BACKUP_PREFIX
    #[envconfig(
        from = "KC_OPERATOR_MIGRATION_BACKUP_PREFIX",
        default = "migration-backup"
    )]
    pub backup_prefix: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            backup_prefix: "migration-backup".to_string(),
        }
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Keycloak.to_string(),
            k8s_namespace: "default".to_string(),
            keycloak_image: None,
            rhsso_image: None,
            postgresql_image: DEFAULT_POSTGRESQL_IMAGE.to_string(),
            migration: MigrationConfig::default(),
        }
    }
}

impl OperatorConfig {
    pub fn default_profile(&self) -> Profile {
        Profile::from_name(&self.profile)
    }

    /// Image the templating model renders for the given profile.
    pub fn workload_image(&self, profile: Profile) -> &str {
        match profile {
            Profile::Keycloak => self
                .keycloak_image
                .as_deref()
                .unwrap_or(DEFAULT_KEYCLOAK_IMAGE),
            Profile::Rhsso => {
                self.rhsso_image.as_deref().unwrap_or(DEFAULT_RHSSO_IMAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(profile: &str) -> OperatorConfig {
        OperatorConfig {
            profile: profile.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn workload_image_falls_back_to_builtin_defaults() {
        let cfg = base("keycloak");
        assert_eq!(
            cfg.workload_image(Profile::Keycloak),
            DEFAULT_KEYCLOAK_IMAGE
        );
        assert_eq!(cfg.workload_image(Profile::Rhsso), DEFAULT_RHSSO_IMAGE);
    }

    #[test]
    fn workload_image_respects_env_overrides() {
        let mut cfg = base("rhsso");
        cfg.rhsso_image = Some("registry.local/sso:custom".into());
        assert_eq!(
            cfg.workload_image(Profile::Rhsso),
            "registry.local/sso:custom"
        );
        assert_eq!(
            cfg.workload_image(Profile::Keycloak),
            DEFAULT_KEYCLOAK_IMAGE
        );
    }

    #[test]
    fn default_profile_parses_names() {
        assert_eq!(base("RHSSO").default_profile(), Profile::Rhsso);
        assert_eq!(base("rhsso").default_profile(), Profile::Rhsso);
        assert_eq!(base("keycloak").default_profile(), Profile::Keycloak);
        assert_eq!(base("").default_profile(), Profile::Keycloak);
    }

    #[test]
    fn init_from_hashmap_reads_overrides() {
        let env = std::collections::HashMap::from([
            (
                "KC_OPERATOR_MIGRATION_BACKUP_PREFIX".to_string(),
                "pre-upgrade".to_string(),
            ),
            ("KC_OPERATOR_NAMESPACE".to_string(), "sso-system".to_string()),
        ]);
        let cfg = OperatorConfig::init_from_hashmap(&env).unwrap();
        assert_eq!(cfg.profile, "keycloak");
        assert_eq!(cfg.k8s_namespace, "sso-system");
        assert_eq!(cfg.postgresql_image, DEFAULT_POSTGRESQL_IMAGE);
        assert_eq!(cfg.keycloak_image, None);
        assert_eq!(cfg.migration.backup_prefix, "pre-upgrade");
    }
}
