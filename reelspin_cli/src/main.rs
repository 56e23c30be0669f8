use clap::{Parser, Subcommand};
use reelspin_core::{GameConfig, SlotMachine};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod play;
mod simulate;

#[derive(Parser)]
#[command(name = "reelspin", about = "Five-reel slot machine for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Seed for the reel RNG, random when omitted
    #[arg(long, global = true, env = "REELSPIN_SEED")]
    seed: Option<u64>,
    /// Credits at start and after every restart
    #[arg(long, global = true, env = "REELSPIN_CREDITS")]
    credits: Option<i64>,
    /// Reel scroll interval in milliseconds
    #[arg(long, global = true, env = "REELSPIN_TICK_MS")]
    tick_ms: Option<u64>,
    /// JSON file with game settings; flags override it
    #[arg(long, global = true, env = "REELSPIN_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play,
    /// Run spins headless and report the return
    Simulate {
        #[arg(long, default_value_t = 1000)]
        spins: u64,
        #[arg(long, default_value_t = 1)]
        bet: u8,
        #[arg(long, default_value_t = 1)]
        lines: u8,
        /// Use the max bet ladder instead of --bet/--lines
        #[arg(long)]
        max_bet: bool,
        /// Write one CSV row per spin
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn build_config(cli: &Cli) -> anyhow::Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(credits) = cli.credits {
        config.starting_credits = credits;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick = Duration::from_millis(tick_ms);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let mut machine = match cli.seed {
        Some(seed) => SlotMachine::seeded(config, seed),
        None => SlotMachine::from_entropy(config),
    };

    match cli.command {
        Commands::Play => play::run(&mut machine).await?,
        Commands::Simulate {
            spins,
            bet,
            lines,
            max_bet,
            csv,
        } => {
            let opts = simulate::SimulateOptions {
                spins,
                bet,
                lines,
                max_bet,
                csv,
            };
            let summary = simulate::run(&mut machine, &opts)?;
            println!("{}", summary);
        }
    }

    Ok(())
}
