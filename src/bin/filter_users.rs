// Lists users younger than 18 from a JSON user database

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vertical_composer::{
    error::ComposerError,
    tools::{filter_underage, load_users, ADULT_AGE},
};

#[derive(Parser)]
#[command(name = "filter-users", version, about = "Print the underage users in a JSON user database")]
struct Cli {
    /// JSON file shaped like {"users": [{"age": 17, ...}, ...]}
    path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = match cli.path {
        Some(path) => path,
        None => {
            let path = PathBuf::from("users_db.json");
            println!("Using default JSON file: {}", path.display());
            path
        }
    };

    let db = match load_users(&path) {
        Ok(db) => db,
        Err(e @ ComposerError::Tool(_)) => {
            println!("{}", e.user_message());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let underage = filter_underage(&db, ADULT_AGE);
    debug!("{} of {} users are under {}", underage.len(), db.users.len(), ADULT_AGE);

    if underage.is_empty() {
        println!("No underage users found.");
    } else {
        println!("Underage users:");
        for user in underage {
            println!("{}", serde_json::to_string(user)?);
        }
    }

    Ok(())
}
