use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use cafe_orders::{config, db, migrator::Migrator};

#[derive(Parser)]
#[command(
    name = "cafe-migrate",
    about = "Create and migrate the cafe_orders database",
    version
)]
struct Cli {
    /// Database URL; defaults to the configured `database_url`
    #[arg(long)]
    database_url: Option<String>,

    #[arg(long, global = true, action = ArgAction::SetTrue, help = "Log as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CREATE DATABASE IF NOT EXISTS for the database named in the URL
    CreateDatabase,
    /// Apply pending migrations
    Up {
        /// Number of migrations to apply (all when omitted)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Run every table definition again; a no-op on a provisioned database
    ReapplySchema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => {
            config::load_config()
                .context("failed to load configuration")?
                .database_url
        }
    };
    config::init_tracing("info", cli.json);

    match cli.command {
        Commands::CreateDatabase => {
            db::ensure_database(&database_url).await?;
            println!("Database ready");
        }
        Commands::Up { steps } => {
            let pool = db::establish_connection(&database_url).await?;
            Migrator::up(&pool, steps).await?;
            info!("Migrations applied");
        }
        Commands::Down { steps } => {
            let pool = db::establish_connection(&database_url).await?;
            Migrator::down(&pool, Some(steps)).await?;
            info!("Rolled back {} migration(s)", steps);
        }
        Commands::Status => {
            let pool = db::establish_connection(&database_url).await?;
            for migration in Migrator::get_applied_migrations(&pool).await? {
                println!("applied  {}", migration.name());
            }
            for migration in Migrator::get_pending_migrations(&pool).await? {
                println!("pending  {}", migration.name());
            }
        }
        Commands::ReapplySchema => {
            let pool = db::establish_connection(&database_url).await?;
            db::reapply_schema(&pool).await?;
            println!("Schema definitions re-applied");
        }
    }

    Ok(())
}
