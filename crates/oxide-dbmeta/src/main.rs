//! oxide-dbmeta CLI
//!
//! Builds, exports and updates Firebird schemas from plain DDL scripts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_dbmeta::commands::DEFAULT_FILE_NAME;
use oxide_dbmeta::{build_db, export, update_db, ExportSource, ServerSettings};
use oxide_ddl_firebird::DEFAULT_PORT;

/// Firebird schema scripts: build, export, update.
#[derive(Parser)]
#[command(name = "oxide-dbmeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new database and run every script against it.
    BuildDb {
        /// Directory that will hold the database file.
        #[arg(short = 'd', long)]
        db_dir: PathBuf,

        /// Directory of *.sql scripts.
        #[arg(short, long)]
        scripts_dir: PathBuf,

        /// Database file name.
        #[arg(long, default_value = DEFAULT_FILE_NAME)]
        file_name: String,

        /// Server host.
        #[arg(long, env = "FIREBIRD_HOST", default_value = "localhost")]
        host: String,

        /// Server port.
        #[arg(long, env = "FIREBIRD_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// User name.
        #[arg(short, long, env = "ISC_USER", default_value = "SYSDBA")]
        user: String,

        /// Password.
        #[arg(short, long, env = "ISC_PASSWORD", default_value = "masterkey", hide_env_values = true)]
        password: String,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the schema of a database as script files.
    ExportScripts {
        /// Connection string (Database=...; DataSource=...; ...).
        #[arg(
            short,
            long,
            env = "DBMETA_CONNECTION",
            hide_env_values = true,
            conflicts_with = "snapshot",
            required_unless_present = "snapshot"
        )]
        connection_string: Option<String>,

        /// Export from a recorded catalog snapshot instead of a database.
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Directory the scripts are written to.
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Also record the catalog as a JSON snapshot.
        #[arg(long)]
        save_snapshot: Option<PathBuf>,
    },

    /// Run every script against an existing database.
    UpdateDb {
        /// Connection string, or a sqlite: URL for a scratch run.
        #[arg(short, long, env = "DBMETA_CONNECTION", hide_env_values = true)]
        connection_string: String,

        /// Directory of *.sql scripts.
        #[arg(short, long)]
        scripts_dir: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::BuildDb {
            db_dir,
            scripts_dir,
            file_name,
            host,
            port,
            user,
            password,
            dry_run,
        } => {
            let server = ServerSettings {
                host,
                port,
                user,
                password,
            };
            let summary = build_db(&db_dir, &file_name, &scripts_dir, &server, dry_run).await?;
            info!(
                files = summary.files,
                statements = summary.statements,
                "build-db finished"
            );
        }

        Commands::ExportScripts {
            connection_string,
            snapshot,
            output_dir,
            save_snapshot,
        } => {
            let source = match (connection_string, snapshot) {
                (_, Some(path)) => ExportSource::Snapshot(path),
                (Some(connection), None) => ExportSource::Connection(connection),
                (None, None) => anyhow::bail!("either --connection-string or --snapshot is required"),
            };
            let summary = export(&source, &output_dir, save_snapshot.as_deref()).await?;
            for file in &summary.files {
                println!("{} ({} statements)", file.path.display(), file.statements);
            }
        }

        Commands::UpdateDb {
            connection_string,
            scripts_dir,
            dry_run,
        } => {
            let summary = update_db(&connection_string, &scripts_dir, dry_run).await?;
            info!(
                files = summary.files,
                statements = summary.statements,
                "update-db finished"
            );
        }
    }
    Ok(())
}
