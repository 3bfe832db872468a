//! Process lifecycle: everything between loaded settings and a running (or migrated) database.

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::PgPool;

use crate::modules;

/// Connect, migrate, and serve HTTP until a shutdown signal arrives.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint(),
        "bookshelf bootstrap starting"
    );

    let pool = bookshelf_db::connect(&settings.database).await?;
    let registry = build_registry(&pool)?;
    let ctx = InitCtx { settings };

    registry.init_modules(&ctx).await?;
    bookshelf_db::apply_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(&registry, settings).await;

    let stopped = registry.stop_modules().await;
    pool.close().await;
    tracing::info!("database pool closed");

    served?;
    stopped
}

/// Connect and apply every module's migrations, then exit.
pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = bookshelf_db::connect(&settings.database).await?;
    let registry = build_registry(&pool)?;

    let migrations = registry.collect_migrations();
    bookshelf_db::apply_migrations(&pool, &migrations)
        .await
        .context("failed to apply migrations")?;
    tracing::info!(count = migrations.len(), "migrations complete");

    pool.close().await;
    Ok(())
}

fn build_registry(pool: &PgPool) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool).context("failed to register modules")?;
    Ok(registry)
}
