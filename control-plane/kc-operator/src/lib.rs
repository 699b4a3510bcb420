pub mod config;
pub mod controller;
pub mod crd;
pub mod model;

use tracing_subscriber::{
    EnvFilter, filter::Directive, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use controller::migration::{
    DefaultMigrator, MigrationError, MigrationOutcome, Migrator,
};

pub fn init_tracing(default_env: &str) {
    let directive: Option<Directive> = default_env
        .parse()
        .or_else(|_| "info".parse())
        .ok();
    let mut filter = EnvFilter::builder()
        .with_env_var("RUST_LOG")
        .from_env_lossy();
    if let Some(d) = directive {
        filter = filter.add_directive(d);
    }

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}

