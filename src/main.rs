use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vertical_composer::{
    composition::Composer,
    config::Config,
    video::FfmpegBackend,
};

#[derive(Parser)]
#[command(
    name = "vertical-composer",
    version,
    about = "Reformat a video onto a vertical 1080x1920 canvas with a blurred background",
    long_about = "Vertical-Composer takes the first video found in the input directory, scales it to the canvas width, centers it over a blurred full-bleed copy of itself, and writes the result to the output directory."
)]
struct Cli {
    /// Directory to take the input video from
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory to write the vertical video to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Vertical-Composer v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(input_dir) = cli.input_dir {
        config.paths.input_dir = input_dir;
    }
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }

    let backend = FfmpegBackend::from_config(&config.encoding);
    let composer = Composer::new(config, backend);

    let prepared = match composer.prepare().await {
        Ok(Some(prepared)) => prepared,
        Ok(None) => {
            let config = composer.config();
            println!(
                "No video files found in '{}'. Supported: {:?}",
                config.paths.input_dir.display(),
                config.input.extensions
            );
            return Ok(());
        }
        Err(e) => {
            error!("{}", e.user_message());
            return Err(e.into());
        }
    };

    println!("Found video: {}", prepared.source.path.display());
    println!("Saving vertical video to: {}", prepared.output.display());

    if let Err(e) = composer.render(&prepared).await {
        error!("{}", e.user_message());
        return Err(e.into());
    }

    info!("Done! Output saved to: {:?}", prepared.output);
    Ok(())
}
