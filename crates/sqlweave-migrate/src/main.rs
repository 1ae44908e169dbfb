//! `sqlweave-migrate`: apply, revert and inspect the SQL migrations of one
//! class against a database.

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sqlweave_migrate::prelude::*;
use sqlweave_sqlx::{ConnectionConfig, Database, Options};

/// Versioned SQL migrations.
#[derive(Parser)]
#[command(name = "sqlweave-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// JSON connection config file; takes precedence over the URL.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Migrations directory; files live in `<dir>/<class>`.
    #[arg(long, default_value = "migrations")]
    dir: PathBuf,

    /// Migration class.
    #[arg(long, default_value = "main")]
    class: String,

    /// Log every statement with its arguments.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the bookkeeping table for the class.
    Init,

    /// Apply pending migrations.
    Upgrade,

    /// Revert one applied migration.
    Downgrade {
        /// Version to revert.
        version: String,
    },

    /// Show migration status.
    Status,

    /// Write an empty up/down migration pair.
    Create {
        /// Migration name.
        name: String,
    },
}

impl Cli {
    async fn connect(&self) -> anyhow::Result<Database> {
        let options = Options::default().debug(self.verbose);
        if let Some(path) = &self.config {
            let config = ConnectionConfig::from_file(path)?;
            return Ok(Database::from_config(&config, options).await?);
        }
        match &self.database {
            Some(url) => Ok(Database::connect(url, options).await?),
            None => bail!("no database given: pass --database, set DATABASE_URL or use --config"),
        }
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let class_dir = cli.dir.join(&cli.class);

    if let Commands::Create { name } = &cli.command {
        let (version, up, down) = create_migration(&class_dir, name)?;
        println!("Created {version}");
        println!("  {}", up.display());
        println!("  {}", down.display());
        return Ok(());
    }

    let db = cli.connect().await?;
    let mut migrator = Migrator::new(db, &cli.class)?;
    migrator.init().await?;

    match &cli.command {
        Commands::Init => {
            info!(table = %migrator.table(), "Migrations initialized");
        }

        Commands::Upgrade => {
            let set = MigrationSet::load_dir(&class_dir)?;
            let applied = migrator.upgrade(&set).await?;
            if applied.is_empty() {
                info!("No pending migrations.");
            }
            for version in applied {
                println!(" [X] {version}");
            }
        }

        Commands::Downgrade { version } => {
            let set = MigrationSet::load_dir(&class_dir)?;
            if migrator.downgrade(&set, version).await? {
                println!(" [ ] {version}");
            }
        }

        Commands::Status => {
            let set = MigrationSet::load_dir(&class_dir)?;
            let status = migrator.status(&set).await?;
            println!("{} ({} known)", migrator.table(), status.len());
            for entry in &status {
                match entry.applied_at {
                    Some(at) => println!(
                        " [X] {} ({})",
                        entry.version,
                        at.format("%Y-%m-%d %H:%M:%S")
                    ),
                    None => println!(" [ ] {}", entry.version),
                }
            }
        }

        Commands::Create { .. } => {}
    }

    Ok(())
}
