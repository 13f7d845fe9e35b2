use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use tokio::fs;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

const MIGRATIONS_DIR: &str = "migrations";

pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let conn = Database::connect(database_url)
        .await
        .context("connecting to the storage database")?;
    Ok(conn)
}

/// Connects and brings the schema up to date.
pub async fn connect_and_migrate(database_url: &str) -> Result<OrmConn> {
    let conn = create_orm_conn(database_url).await?;
    run_migrations(&conn).await?;
    Ok(conn)
}

/// Splits a migration file into single statements. `--` comment lines are dropped.
fn split_statements(sql: &str) -> Vec<String> {
    let without_comments: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    without_comments
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}

async fn migration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("reading {}", dir.display()))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs every `migrations/*.sql` file not yet recorded in `schema_migrations`, in filename order.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            name TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );",
    ))
    .await?;

    for file in migration_files(Path::new(MIGRATIONS_DIR)).await? {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if is_applied(conn, backend, &name).await? {
            continue;
        }

        let sql = fs::read_to_string(&file).await?;
        // Postgres prepared statements hold a single command each.
        for statement in split_statements(&sql) {
            conn.execute(Statement::from_string(backend, statement))
                .await
                .with_context(|| format!("applying {name}"))?;
        }
        conn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (name) VALUES ($1)",
            [name.clone().into()],
        ))
        .await?;
        tracing::info!(migration = %name, "migration applied");
    }

    Ok(())
}

async fn is_applied(conn: &OrmConn, backend: DbBackend, name: &str) -> Result<bool> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT 1 AS applied FROM schema_migrations WHERE name = $1",
            [name.into()],
        ))
        .await?;
    Ok(row.is_some())
}

#[cfg(test)]
mod tests {
    use super::split_statements;

    #[test]
    fn statements_are_split_and_comments_dropped() {
        let sql = "-- storage\nCREATE TABLE a (x INT);\n\n-- index\nCREATE INDEX b ON a (x);\n";
        assert_eq!(
            split_statements(sql),
            vec!["CREATE TABLE a (x INT);", "CREATE INDEX b ON a (x);"]
        );
    }

    #[test]
    fn blank_file_has_no_statements() {
        assert!(split_statements("  \n-- nothing yet\n").is_empty());
    }
}
