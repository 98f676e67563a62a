use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};
use term_snake::game::{GameConfig, GameEngine};
use term_snake::modes::HumanMode;
use term_snake::store::FileScoreStore;

#[derive(Parser)]
#[command(name = "term_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Side length of the square grid (overrides the config file)
    #[arg(long)]
    grid_size: Option<i32>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = ".term_snake_scores.json")]
    score_file: PathBuf,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "term_snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(path: &Path, level: LogLevel) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    WriteLogger::init(level.into(), Config::default(), file).context("Failed to initialize logger")
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    init_logging(&cli.log_file, cli.log_level)?;
    info!("Starting term_snake {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let store = FileScoreStore::open(&cli.score_file);

    let mut human_mode = HumanMode::new(engine, store);
    human_mode.run().await?;

    Ok(())
}
