#![allow(dead_code)]

use std::path::Path;

use sqlweave_core::{params, Executor};
use sqlweave_migrate::prelude::*;
use sqlweave_sqlx::{table_exists, ConnectionConfig, Database, Options};

/// A single-connection in-memory SQLite database.
pub async fn memory_db() -> Database {
    let mut config = ConnectionConfig::sqlite(":memory:");
    config.max_connections = 1;
    Database::from_config(&config, Options::default())
        .await
        .expect("Failed to create in-memory SQLite database")
}

/// A migrator for class `main` with its table created.
pub async fn migrator(db: &Database) -> Migrator {
    let mut migrator = Migrator::new(db.clone(), "main").expect("valid class");
    migrator.init().await.expect("init failed");
    migrator
}

/// Writes `<version>.up.sql` and, when given, `<version>.down.sql`.
pub fn write_migration(dir: &Path, version: &str, up: &str, down: Option<&str>) {
    std::fs::write(dir.join(format!("{version}.up.sql")), up).expect("write up");
    if let Some(down) = down {
        std::fs::write(dir.join(format!("{version}.down.sql")), down).expect("write down");
    }
}

/// Two migrations: a `users` table and an `email` column.
pub fn users_migrations(dir: &Path) {
    write_migration(
        dir,
        "m_0001_users",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);\n\
         INSERT INTO users (name) VALUES ('root');",
        Some("DROP TABLE users;"),
    );
    write_migration(
        dir,
        "m_0002_email",
        "ALTER TABLE users ADD COLUMN email TEXT;",
        Some("ALTER TABLE users DROP COLUMN email;"),
    );
}

pub async fn has_table(db: &Database, table: &str) -> bool {
    let mut db = db.clone();
    table_exists(&mut db, table, None)
        .await
        .expect("table lookup failed")
}

pub async fn user_count(db: &Database) -> i64 {
    let mut db = db.clone();
    let row = db
        .query_row("SELECT COUNT(*) FROM users", params![])
        .await
        .expect("count failed")
        .expect("count row");
    sqlx::Row::get(&row, 0)
}
