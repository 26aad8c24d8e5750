//! blog-server - blog/CMS administration backend

#![allow(missing_docs)]

use blog_rs::Config;
use blog_rs::server;
use blog_rs::utils::logging::init_logging;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "blog-server", version, about = "Blog/CMS administration backend")]
struct Cli {
    /// Configuration file; a missing file falls back to defaults
    #[arg(short, long, env = "BLOG_CONFIG", default_value = "config/blog.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);

    match server::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line messages readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
