use std::time::Duration;

use contracts::domain::a001_community_post::aggregate::CommunityPost;
use contracts::domain::a002_crop_field::aggregate::CropField;
use contracts::domain::a003_field::aggregate::Field;
use contracts::domain::a004_task::aggregate::Task;
use contracts::domain::common::AggregateRoot;
use contracts::system::profiles::Profile;
use contracts::system::users::User;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::config::{self, DatabaseConfig};

/// In-memory databases live as long as their only connection
const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Open the pool and make sure every table exists
pub async fn initialize_database(db_config: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = if db_config.is_memory() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
        options
    } else {
        let db_file = config::resolve_path(&db_config.path);
        if let Some(parent) = db_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Normalize path separators and ensure proper URL form on Windows
        let normalized = db_file.to_string_lossy().replace('\\', "/");
        let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
        let prefix = if needs_leading_slash { "/" } else { "" };
        ConnectOptions::new(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
    };
    options.sqlx_logging(false);

    let conn = Database::connect(options).await?;
    tracing::info!("Database connected: {}", db_config.path);

    bootstrap_schema(&conn).await?;
    Ok(conn)
}

/// Fresh in-memory database with the full schema
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    initialize_database(&DatabaseConfig::in_memory()).await
}

fn table_definitions() -> Vec<(String, String)> {
    let posts = CommunityPost::full_name();
    let crop_fields = CropField::full_name();
    let fields = Field::full_name();
    let tasks = Task::full_name();
    let users = User::full_name();
    let profiles = Profile::full_name();

    vec![
        (
            posts.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {posts} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    "user" TEXT NOT NULL,
                    description TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    version INTEGER NOT NULL DEFAULT 0
                );
                "#
            ),
        ),
        (
            crop_fields.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {crop_fields} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    days INTEGER NOT NULL,
                    planting_date TEXT NOT NULL,
                    harvest_date TEXT NOT NULL,
                    field TEXT NOT NULL,
                    status TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    version INTEGER NOT NULL DEFAULT 0
                );
                "#
            ),
        ),
        (
            fields.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {fields} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    image_url TEXT,
                    product TEXT NOT NULL,
                    location TEXT NOT NULL,
                    field_size TEXT NOT NULL,
                    crop TEXT NOT NULL,
                    days_since_planting INTEGER NOT NULL,
                    planting_date TEXT NOT NULL,
                    expected_harvest_date TEXT NOT NULL,
                    soil_type TEXT NOT NULL,
                    watering TEXT NOT NULL,
                    sunlight TEXT NOT NULL,
                    status TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    version INTEGER NOT NULL DEFAULT 0
                );
                "#
            ),
        ),
        (
            tasks.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {tasks} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    field_id INTEGER NOT NULL REFERENCES {fields}(id) ON DELETE CASCADE,
                    date TEXT NOT NULL,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL,
                    completed INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    version INTEGER NOT NULL DEFAULT 0
                );
                CREATE INDEX IF NOT EXISTS idx_{tasks}_field_id ON {tasks}(field_id);
                "#
            ),
        ),
        (
            users.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {users} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    dni TEXT NOT NULL UNIQUE,
                    role TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    version INTEGER NOT NULL DEFAULT 0
                );
                "#
            ),
        ),
        (
            profiles.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {profiles} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL UNIQUE REFERENCES {users}(id) ON DELETE CASCADE,
                    avatar_url TEXT,
                    language TEXT NOT NULL,
                    notifications_enabled INTEGER NOT NULL DEFAULT 1,
                    alerts_enabled INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    version INTEGER NOT NULL DEFAULT 0
                );
                "#
            ),
        ),
        (
            "sys_settings".to_string(),
            r#"
            CREATE TABLE IF NOT EXISTS sys_settings (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#
            .to_string(),
        ),
    ]
}

/// Minimal schema bootstrap, safe to run on every start
pub async fn bootstrap_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (table, ddl) in table_definitions() {
        if table_exists(conn, &table).await? {
            continue;
        }
        tracing::info!("Creating {} table", table);
        // one statement per call
        for statement in ddl.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            conn.execute_unprepared(statement).await?;
        }
    }
    Ok(())
}

async fn table_exists<C: ConnectionTrait>(conn: &C, table: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [table.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_creates_all_tables_and_is_idempotent() {
        let conn = connect_in_memory().await.unwrap();
        for (table, _) in table_definitions() {
            assert!(table_exists(&conn, &table).await.unwrap(), "{table} missing");
        }
        bootstrap_schema(&conn).await.unwrap();
    }

    #[test]
    fn table_names_follow_aggregate_naming() {
        let names: Vec<String> = table_definitions().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            [
                "a001_community_posts",
                "a002_crop_fields",
                "a003_fields",
                "a004_tasks",
                "sys_users",
                "sys_profiles",
                "sys_settings"
            ]
        );
    }
}
