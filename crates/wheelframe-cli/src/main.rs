use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wheelframe_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "wheelframe")]
#[command(author, version, about = "Scroll-driven transform animation previewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/wheelframe/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview a scene in the terminal, driven by the mouse wheel
    Run {
        /// Scene file (.toml or .json)
        #[arg(short = 's', long)]
        scene: Option<PathBuf>,
    },
    /// Print the composite transform of each layer at one frame position
    Eval {
        /// Frame position to evaluate
        #[arg(short = 'p', long, allow_negative_numbers = true)]
        position: f64,
        /// Scene file (.toml or .json)
        #[arg(short = 's', long)]
        scene: PathBuf,
        /// Only evaluate this layer
        #[arg(short = 'l', long)]
        layer: Option<String>,
    },
    /// Replay a scene's scripted wheel events and print every frame
    Simulate {
        /// Scene file (.toml or .json)
        #[arg(short = 's', long)]
        scene: PathBuf,
        /// How long to run, in milliseconds
        #[arg(short = 'd', long, default_value_t = 2000)]
        duration_ms: u64,
        /// Tick interval in milliseconds (defaults to ticker.tick_rate_ms)
        #[arg(short = 't', long)]
        tick_ms: Option<u64>,
        /// Drive the session on the wall clock instead of a virtual one
        #[arg(long)]
        realtime: bool,
        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config_path.unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    // The terminal preview owns the screen, so it logs to a file
    let log_to_file = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, log_to_file)?;

    match cli.command {
        Some(Commands::Run { scene }) => commands::run::run(&config, scene.as_deref()),
        None => commands::run::run(&config, None),
        Some(Commands::Eval {
            position,
            scene,
            layer,
        }) => commands::eval::run(&scene, position, layer.as_deref()),
        Some(Commands::Simulate {
            scene,
            duration_ms,
            tick_ms,
            realtime,
            json,
        }) => {
            let options = commands::simulate::SimulateOptions {
                duration_ms,
                tick_ms: tick_ms.unwrap_or(config.ticker.tick_rate_ms),
                realtime,
                json,
            };
            commands::simulate::run(&config, &scene, options).await
        }
        Some(Commands::Config { init }) => commands::config::run(&config, &config_path, init),
    }
}

/// Install the tracing subscriber: `RUST_LOG` wins over the configured level
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    let (stderr_layer, file_layer) = if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}
