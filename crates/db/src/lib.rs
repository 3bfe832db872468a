//! PostgreSQL connection bootstrap and migration runner.
//!
//! The pool built here is the only database handle in the process; it is handed
//! to whichever stores need it.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use bookshelf_kernel::{settings::DatabaseSettings, Migration};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};

/// Translate settings into driver connect options.
pub fn connect_options(settings: &DatabaseSettings) -> anyhow::Result<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(&settings.ssl_mode)
        .with_context(|| format!("invalid database ssl_mode '{}'", settings.ssl_mode))?;

    Ok(PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(ssl_mode))
}

/// Open the connection pool.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let options = connect_options(settings)?;

    tracing::info!(
        target: "bookshelf-db",
        endpoint = %settings.endpoint(),
        max_connections = settings.max_connections,
        "connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database at {}", settings.endpoint()))
}

/// Run every collected migration against the pool, in order.
pub async fn apply_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    for (module, migration) in migrations {
        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| {
                format!(
                    "failed to apply migration '{}' of module '{}'",
                    migration.id, module
                )
            })?;

        tracing::info!(
            target: "bookshelf-db",
            module = %module,
            migration = migration.id,
            "migration applied"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_options_follow_settings() {
        let settings = DatabaseSettings {
            host: "db.internal".to_string(),
            port: 6543,
            user: "catalog".to_string(),
            name: "books".to_string(),
            ssl_mode: "require".to_string(),
            ..DatabaseSettings::default()
        };

        let options = connect_options(&settings).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "catalog");
        assert_eq!(options.get_database(), Some("books"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn unknown_ssl_mode_is_rejected() {
        let settings = DatabaseSettings {
            ssl_mode: "sometimes".to_string(),
            ..DatabaseSettings::default()
        };

        let err = connect_options(&settings).unwrap_err();
        assert!(err.to_string().contains("invalid database ssl_mode"));
    }
}
