//! Versioned SQL migrations.
//!
//! `sqlweave-migrate` applies plain SQL migration files and records every
//! applied version in a per-class bookkeeping table, so independent sets of
//! migrations (for instance `main` and `reporting`) can live in the same
//! database.
//!
//! # Example
//!
//! ```rust,no_run
//! use sqlweave_migrate::prelude::*;
//! use sqlweave_sqlx::{Database, Options};
//!
//! # async fn demo() -> Result<()> {
//! let db = Database::connect("sqlite://app.db?mode=rwc", Options::default()).await?;
//! let set = MigrationSet::load_dir("migrations/main")?;
//!
//! let mut migrator = Migrator::new(db, "main")?;
//! migrator.init().await?;
//! for version in migrator.upgrade(&set).await? {
//!     println!("applied {version}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Create the bookkeeping table
//! sqlweave-migrate --database sqlite://app.db init
//!
//! # Write an empty up/down pair
//! sqlweave-migrate create add_users
//!
//! # Apply pending migrations
//! sqlweave-migrate --database sqlite://app.db upgrade
//!
//! # Revert one version
//! sqlweave-migrate --database sqlite://app.db downgrade m_1718000000_add_users
//! ```

pub mod error;
pub mod migration;
pub mod migrator;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{MigrateError, Result};
    pub use crate::migration::{create_migration, split_statements, Migration, MigrationSet};
    pub use crate::migrator::{MigrationStatus, Migrator};
}
