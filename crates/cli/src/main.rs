use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_kernel::settings::{DatabaseSettings, Settings};

#[derive(Debug, Parser)]
#[command(name = "bookstore-cli", version, about = "Bookstore service operations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run migrations and serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print every documented HTTP route
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => bookstore::run(settings).await,
        Command::Migrate => {
            let applied = bookstore::migrate_only(&settings).await?;
            tracing::info!(applied, "migrate finished");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Routes => print_routes().await,
    }
}

/// Routes come from the module registry; no real database is touched.
async fn print_routes() -> anyhow::Result<()> {
    let pool = bookstore_db::connect(&DatabaseSettings::in_memory()).await?;
    let registry = bookstore::build_registry(pool.clone());
    let document = bookstore_http::router::merged_openapi(&registry);

    if let Some(paths) = document["paths"].as_object() {
        for (path, item) in paths {
            let Some(operations) = item.as_object() else {
                continue;
            };
            for method in operations.keys() {
                println!("{:<7} {}", method.to_uppercase(), path);
            }
        }
    }

    pool.close().await;
    Ok(())
}
