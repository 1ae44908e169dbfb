//! Migration files.
//!
//! A migration is a pair of SQL files in one directory:
//!
//! ```text
//! migrations/main/m_1718000000_create_users.up.sql
//! migrations/main/m_1718000000_create_users.down.sql
//! ```
//!
//! The shared prefix is the version. Versions sort lexically, so the
//! timestamp written by [`create_migration`] keeps them in creation order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{MigrateError, Result};

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";

/// One versioned schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Version key stored in the bookkeeping table.
    pub version: String,
    /// Statements applied on upgrade, in order.
    pub up: Vec<String>,
    /// Statements applied on downgrade, in order.
    pub down: Vec<String>,
}

impl Migration {
    /// Creates a migration from already split statements.
    #[must_use]
    pub fn new(version: impl Into<String>, up: Vec<String>, down: Vec<String>) -> Self {
        Self {
            version: version.into(),
            up,
            down,
        }
    }
}

/// Migrations of one class, sorted by version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSet {
    migrations: Vec<Migration>,
}

impl MigrationSet {
    /// Builds a set, sorting by version.
    #[must_use]
    pub fn new(mut migrations: Vec<Migration>) -> Self {
        migrations.sort_by(|a, b| a.version.cmp(&b.version));
        Self { migrations }
    }

    /// Loads every `<version>.up.sql` / `<version>.down.sql` pair in `dir`.
    ///
    /// A missing down file means the downgrade has nothing to run. A down
    /// file without its up file is an error. Other files are ignored.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MigrateError::DirNotFound(dir.to_path_buf()));
        }

        let mut pairs: BTreeMap<String, (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(version) = file_name.strip_suffix(UP_SUFFIX) {
                pairs.entry(version.to_string()).or_default().0 = Some(path.clone());
            } else if let Some(version) = file_name.strip_suffix(DOWN_SUFFIX) {
                pairs.entry(version.to_string()).or_default().1 = Some(path.clone());
            }
        }

        let mut migrations = Vec::with_capacity(pairs.len());
        for (version, (up, down)) in pairs {
            let Some(up) = up else {
                let path = down.unwrap_or_else(|| dir.join(&version));
                return Err(MigrateError::OrphanDownFile { version, path });
            };
            let up = split_statements(&std::fs::read_to_string(&up)?);
            let down = match down {
                Some(path) => split_statements(&std::fs::read_to_string(path)?),
                None => Vec::new(),
            };
            debug!(version = %version, up = up.len(), down = down.len(), "Loaded migration");
            migrations.push(Migration { version, up, down });
        }

        Ok(Self { migrations })
    }

    /// Looks a migration up by version.
    #[must_use]
    pub fn get(&self, version: &str) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.version == version)
    }

    /// Iterates in version order.
    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.migrations.iter()
    }

    /// Number of migrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Returns `true` when the set holds no migration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl<'a> IntoIterator for &'a MigrationSet {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}

/// Splits a SQL script on `;` outside quotes and comments.
///
/// Statements are trimmed; empty and comment-only pieces are dropped.
#[must_use]
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    // Line comment, dropped up to the newline.
                    for next in chars.by_ref() {
                        if next == '\n' {
                            current.push('\n');
                            break;
                        }
                    }
                }
                ';' => push_statement(&mut statements, &mut current),
                _ => current.push(c),
            },
        }
    }
    push_statement(&mut statements, &mut current);
    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

/// Returns `true` for non-empty ASCII identifiers made of letters, digits
/// and underscores.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Writes an empty up/down pair named `m_<unix time>_<name>` into `dir`.
///
/// Returns the version and the paths of both files.
pub fn create_migration(dir: impl AsRef<Path>, name: &str) -> Result<(String, PathBuf, PathBuf)> {
    if !is_valid_name(name) {
        return Err(MigrateError::InvalidName(name.to_string()));
    }
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let version = format!("m_{}_{name}", Utc::now().timestamp());
    let up = dir.join(format!("{version}{UP_SUFFIX}"));
    let down = dir.join(format!("{version}{DOWN_SUFFIX}"));
    for path in [&up, &down] {
        if path.exists() {
            return Err(MigrateError::FileExists(path.clone()));
        }
    }

    std::fs::write(&up, format!("-- {version}: upgrade\n"))?;
    std::fs::write(&down, format!("-- {version}: downgrade\n"))?;
    info!(version = %version, path = %up.display(), "Created migration");
    Ok((version, up, down))
}
