// Counts the whitespace-separated words in a text file

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vertical_composer::{error::ComposerError, tools::count_words_in_file};

#[derive(Parser)]
#[command(name = "word-count", version, about = "Count the words in a text file")]
struct Cli {
    /// Text file to read; prompted for when omitted
    path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn prompt_for_path() -> Result<PathBuf> {
    print!("Enter the path to the text file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
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
        None => prompt_for_path()?,
    };

    if !path.exists() {
        println!("Error: File '{}' does not exist.", path.display());
        return Ok(());
    }

    println!("Processing file: {}", path.display());
    match count_words_in_file(&path) {
        Ok(count) => println!("Number of words in the file: {}", count),
        Err(e @ ComposerError::Tool(_)) => {
            println!("{}", e);
            println!("Failed to process the file.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
