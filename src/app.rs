//! Application bootstrap: wires the pool, the module registry and the HTTP
//! server together, and drives the module lifecycle around them.

use anyhow::Context;
use axum::Router;

use bookstore_db::SqlitePool;
use bookstore_kernel::{InitCtx, ModuleRegistry, Settings};

use crate::modules;

/// Registry with the database core module and every resource module.
pub fn build_registry(pool: SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Apply every pending module migration and return how many ran.
pub async fn migrate(pool: &SqlitePool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = bookstore_db::migrate::run(pool, &migrations)
        .await
        .with_context(|| "failed to apply migrations")?;

    tracing::info!(applied, total = migrations.len(), "migrations complete");
    Ok(applied)
}

/// Connect, migrate and initialize modules, returning the ready router.
///
/// The registry is returned alongside so callers can stop modules when done.
pub async fn build_app(settings: &Settings) -> anyhow::Result<(Router, ModuleRegistry)> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(pool.clone());
    migrate(&pool, &registry).await?;

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;

    let router = bookstore_http::build_router(&registry, settings);
    Ok((router, registry))
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore bootstrap starting"
    );

    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(pool.clone());
    migrate(&pool, &registry).await?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("bookstore bootstrap complete");

    let served = bookstore_http::start_server(&registry, &settings).await;

    registry
        .stop_all()
        .await
        .with_context(|| "failed to stop modules")?;

    served
}

/// Connect and apply migrations without serving.
pub async fn migrate_only(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(pool.clone());
    let applied = migrate(&pool, &registry).await?;
    pool.close().await;
    Ok(applied)
}
