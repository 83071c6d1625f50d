//! flappyq CLI - headless Q-learning trainer for the obstacle-dodging game
//!
//! This CLI provides:
//! - Training the tabular agent over many simulated episodes
//! - Initializing a fresh persisted value table

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flappyq")]
#[command(version, about = "Tabular Q-learning trainer for the obstacle-dodging game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent over simulated episodes
    Train(flappyq::cli::commands::train::TrainArgs),

    /// Write a fresh seeded value table
    InitQvalues(flappyq::cli::commands::init_qvalues::InitQvaluesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => flappyq::cli::commands::train::execute(args),
        Commands::InitQvalues(args) => flappyq::cli::commands::init_qvalues::execute(args),
    }
}
