mod app;
pub use app::{App, AppOptions};

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gumbex_experiment::SpeakerBias;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gumbex")]
#[command(about = "Plans a gumball session and animates every globe headlessly", long_about = None)]
struct Cli {
    /// Seed for a reproducible session; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Prediction condition (0 baseline, 1 yellow, 2 green, 3 same speaker)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    condition: Option<u8>,

    /// Exposure speaker bias: cautious or confident
    #[arg(long)]
    bias: Option<SpeakerBias>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    lexical_balance: Option<u8>,

    /// Animation frames per globe screen
    #[arg(long, default_value_t = 60)]
    ticks: u64,

    /// Pace frames in real time at this rate instead of running flat out
    #[arg(long)]
    fps: Option<f64>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let options = AppOptions {
        seed: cli.seed,
        condition: cli.condition,
        bias: cli.bias,
        lexical_balance: cli.lexical_balance,
        ticks: cli.ticks,
        fps: cli.fps,
        output: cli.output,
    };
    let app = App::new(options)?;
    app.run()?;

    Ok(())
}
