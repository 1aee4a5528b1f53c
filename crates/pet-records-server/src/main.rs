//! Pet Records Server Binary
//!
//! ```bash
//! # Start the API on port 3000
//! pet-records-server serve --port 3000
//!
//! # Back up and restore the database
//! pet-records-server export backup.db
//! pet-records-server import backup.db
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pet_records_core::Database;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pet medical records REST backend
#[derive(Parser, Debug)]
#[command(name = "pet-records-server")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file
    #[arg(
        long,
        global = true,
        default_value = "pet_medical_records.db",
        env = "PET_RECORDS_DB"
    )]
    db: PathBuf,

    /// Log filter (trace, debug, info, warn, error or a full directive)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API
    Serve(ServeArgs),

    /// Write a consistent copy of the database
    Export {
        /// Destination file; must not exist
        output: PathBuf,
    },

    /// Replace the database with a previously exported file
    Import {
        /// Exported database file
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// HTTP bind address
    #[arg(short, long, default_value = "127.0.0.1", env = "PET_RECORDS_BIND")]
    bind: String,

    /// HTTP port
    #[arg(short, long, default_value = "3000", env = "PET_RECORDS_PORT")]
    port: u16,
}

fn setup_logging(cli: &Cli) {
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    match &cli.command {
        Commands::Serve(args) => {
            let db = Database::open(&cli.db)
                .with_context(|| format!("opening {}", cli.db.display()))?;
            info!(db = %cli.db.display(), "Database ready");
            let addr = format!("{}:{}", args.bind, args.port);
            pet_records_server::serve(db, &addr).await?;
        }
        Commands::Export { output } => {
            let db = Database::open(&cli.db)
                .with_context(|| format!("opening {}", cli.db.display()))?;
            db.export_to(output)
                .with_context(|| format!("exporting to {}", output.display()))?;
            info!(output = %output.display(), "Database exported");
        }
        Commands::Import { input } => {
            Database::import_file(input, &cli.db)
                .with_context(|| format!("importing {}", input.display()))?;
            info!(input = %input.display(), db = %cli.db.display(), "Database imported");
        }
    }

    Ok(())
}
