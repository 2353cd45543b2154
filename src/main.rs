mod cli;

use crate::cli::{Cli, Commands};
use clap::Parser;
use tracing::{error, info};

use wled_bridge::application::use_cases::{CheckConfigUseCase, RunApplicationUseCase};
use wled_bridge::debug::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.into_command();

    let args = match &command {
        Commands::Run(args) | Commands::CheckConfig(args) => args,
    };
    // Initialize logging
    if let Err(e) = init_logging(&args.log_config()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match command {
        Commands::Run(args) => {
            info!("Starting application...");
            let use_case = RunApplicationUseCase::new(args.bridge_config());

            match use_case.execute().await {
                Ok(_) => {
                    info!("Application terminated normally");
                }
                Err(e) => {
                    error!("Application failed: {:#}", e);
                    eprintln!("❌ Application failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::CheckConfig(args) => {
            let use_case = CheckConfigUseCase::new(args.bridge_config());

            match use_case.execute() {
                Ok(_) => {
                    println!("✅ Configuration is valid");
                }
                Err(e) => {
                    error!("Configuration check failed: {}", e);
                    eprintln!("❌ Configuration check failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
