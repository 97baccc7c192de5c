//! Applies module migrations once, recording them in `schema_migrations`.

use anyhow::Context;
use sqlx::SqlitePool;

use bookstore_kernel::Migration;

const CREATE_LEDGER: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration not yet recorded, in the given order.
///
/// Each migration runs in its own transaction together with its ledger row,
/// so a failing script leaves neither partial schema nor a ledger entry.
/// Returns the number of migrations applied by this call.
pub async fn run(pool: &SqlitePool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::query(CREATE_LEDGER)
        .execute(pool)
        .await
        .with_context(|| "failed to create migration ledger")?;

    let mut applied = 0;

    for (module, migration) in migrations {
        let recorded: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM schema_migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| "failed to read migration ledger")?;

        if recorded.is_some() {
            tracing::debug!(module = %module, migration = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool
            .begin()
            .await
            .with_context(|| "failed to open migration transaction")?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| "failed to record migration")?;

        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration '{}/{}'", module, migration.id))?;

        tracing::info!(module = %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
