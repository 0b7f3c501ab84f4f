use clap::Parser;
use log::error;

use whenabouts::commands::{self, Cli};
use whenabouts::db::Database;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let database = match Database::new().await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::run(&database, cli.command).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
