pub mod keycloak;
pub mod keycloak_backup;

pub use keycloak::{
    Keycloak, KeycloakSpec, KeycloakStatus, MigrationBackupsSpec,
    MigrationSpec,
};
pub use keycloak_backup::{BackupReason, KeycloakBackup, KeycloakBackupSpec};
