#![allow(dead_code)]

use std::time::Duration;

use sqlweave_core::{params, Executor};
use sqlweave_sqlx::{ConnectionConfig, Database, Options};
use sqlx::Row;

/// A single-connection in-memory SQLite database.
pub async fn memory_db(options: Options) -> Database {
    let mut config = ConnectionConfig::sqlite(":memory:");
    config.max_connections = 1;
    Database::from_config(&config, options)
        .await
        .expect("Failed to create in-memory SQLite database")
}

/// A database with an `accounts (id, owner, balance)` table and two rows.
pub async fn accounts_db(options: Options) -> Database {
    let mut db = memory_db(options).await;
    db.execute(
        "CREATE TABLE accounts (id INTEGER PRIMARY KEY, owner TEXT NOT NULL, balance INTEGER NOT NULL)",
        params![],
    )
    .await
    .expect("Failed to create accounts table");
    db.execute(
        "INSERT INTO accounts (id, owner, balance) VALUES (?, ?, ?), (?, ?, ?)",
        params![1, "alice", 100, 2, "bob", 50],
    )
    .await
    .expect("Failed to seed accounts");
    db
}

/// Current balance of an account.
pub async fn balance(db: &mut Database, id: i64) -> i64 {
    let row = db
        .query_row("SELECT balance FROM accounts WHERE id = ?", params![id])
        .await
        .expect("Balance query failed")
        .expect("Account not found");
    row.get(0)
}

pub const SHORT_TTL: Duration = Duration::from_millis(50);
