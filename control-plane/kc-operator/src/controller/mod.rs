pub mod action;
pub mod migration;
pub mod state;

pub use action::{
    ActionVerb, DesiredClusterState, ManagedResource, ResourceAction,
    ResourceRef,
};
pub use migration::{
    DefaultMigrator, MigrationError, MigrationOutcome, Migrator,
};
pub use state::ClusterState;
