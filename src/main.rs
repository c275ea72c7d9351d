use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_arcade::game::{Difficulty, GameConfig};
use snake_arcade::modes::HumanMode;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Terminal snake with power-ups and difficulty presets")]
struct Cli {
    /// Difficulty preselected on the title screen
    #[arg(long, value_enum, default_value = "medium")]
    difficulty: DifficultyArg,

    /// Cells per side of the square board
    #[arg(long, default_value = "20")]
    grid_size: usize,

    /// Where the high score is kept between runs
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Seed for food and power-up placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here; the terminal belongs to the game, so nothing is logged otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snake_arcade=debug")),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    // Create game configuration from CLI arguments
    let mut config = GameConfig::new(cli.grid_size).with_difficulty(cli.difficulty.into());
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    info!(
        "Starting {}x{} board on {}",
        config.grid_size,
        config.grid_size,
        config.difficulty.as_str()
    );

    let human_mode = HumanMode::new(config, cli.high_score_file)?;
    human_mode.run().await?;

    Ok(())
}
