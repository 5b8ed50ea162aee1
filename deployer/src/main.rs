//! Deployer - Entry Point
//!
//! Sends one deploy request to the deployment service and exits with a code
//! describing how it went.

use clap::Parser;
use colored::Colorize;
use tracing::{error, info};

use deployer_helper::app::options::ClientOptions;
use deployer_helper::cli::Cli;
use deployer_helper::config::DeployConfig;
use deployer_helper::deploy::deploy;
use deployer_helper::logs::{init_logging, LogOptions};
use deployer_helper::storage::settings::Settings;
use deployer_helper::utils::version_info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to render version info: {}", e),
        }
        return;
    }

    let settings = match &cli.config {
        Some(path) => match Settings::load(path).await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red(), e);
                std::process::exit(e.exit_code());
            }
        },
        None => Settings::default(),
    };

    let log_options = LogOptions {
        log_level: cli.log_level.or(settings.log_level).unwrap_or_default(),
        json_format: cli.log_json(&settings),
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    let mut config = DeployConfig::new();
    settings.apply(&mut config);
    cli.apply(&mut config);

    let mut options = ClientOptions::default();
    settings.apply_options(&mut options);
    cli.apply_options(&mut options);

    match deploy(&config, &options, await_shutdown_signal()).await {
        Ok(outcome) => {
            print_output(&outcome.output);
            println!();
            println!("{} Deployment triggered", "[SUCCESS]".green());
        }
        Err(e) => {
            if let Some(output) = e.service_output() {
                print_output(output);
                println!();
            }
            eprintln!("{} {}", "[ERROR]".red(), e);
            std::process::exit(e.exit_code());
        }
    }
}

fn print_output(output: &str) {
    print!("\nResponse From Service : \n\n{}", output);
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("SIGTERM received, cancelling deployment...");
                    }
                    _ = ctrl_c() => {
                        info!("Ctrl+C received, cancelling deployment...");
                    }
                }
            }
            Err(e) => {
                error!("Unable to listen for SIGTERM: {}", e);
                ctrl_c().await;
                info!("Ctrl+C received, cancelling deployment...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
        info!("Ctrl+C received, cancelling deployment...");
    }
}

// Resolves only on an actual Ctrl+C; a listener that fails to install never fires.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
