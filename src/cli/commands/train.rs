//! Train command - run headless Q-learning episodes

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::JsonRepository,
    agent::{Bot, BotConfig},
    game::HitmaskStore,
    pipeline::{ProgressObserver, TrainingConfig, TrainingSession, VerboseObserver},
};

#[derive(Debug, Serialize)]
struct SummaryStats {
    episodes: usize,
    best_score: u32,
    mean_score: f64,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    qvalues: String,
    states: usize,
    learning_rate: f64,
    discount: f64,
    flush_interval: u64,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: SummaryStats,
    scores: Vec<u32>,
    metadata: SummaryMetadata,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: u64,

    /// Path of the persisted value table
    #[arg(long, default_value = "data/qvalues.json")]
    pub qvalues: PathBuf,

    /// MessagePack file with sprite hitmasks (solid boxes when omitted)
    #[arg(long)]
    pub hitmasks: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.7)]
    pub learning_rate: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 1.0)]
    pub discount: f64,

    /// Persist the value table every this many episodes
    #[arg(long, default_value_t = 25)]
    pub flush_interval: u64,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,

    /// Print one `episode | score` line per episode
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.learning_rate) {
        return Err(anyhow!(
            "Invalid --learning-rate {} (expected 0.0-1.0)",
            args.learning_rate
        ));
    }
    if args.flush_interval == 0 {
        return Err(anyhow!("--flush-interval must be at least 1"));
    }

    let masks = match &args.hitmasks {
        Some(path) => HitmaskStore::load_from_file(path)
            .with_context(|| format!("Failed to load hitmasks from {}", path.display()))?,
        None => HitmaskStore::solid(),
    };

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let config = BotConfig {
        learning_rate: args.learning_rate,
        discount: args.discount,
        flush_interval: args.flush_interval,
        ..BotConfig::default()
    };
    let mut bot = Bot::new(Box::new(JsonRepository::new()), args.qvalues.clone(), config);

    println!("=== Training ===");
    println!("Episodes: {}", args.episodes);
    println!(
        "Value table: {} ({} states loaded)",
        args.qvalues.display(),
        bot.q_table().len()
    );
    if let Some(seed) = args.seed {
        println!("Seed: {seed}");
    }
    println!();

    let mut session = TrainingSession::new(TrainingConfig {
        episodes: args.episodes,
        seed: args.seed,
    });
    if args.progress && !args.verbose {
        session = session.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.verbose {
        session = session.with_observer(Box::new(VerboseObserver::new()));
    }

    let result = session.run(&mut bot, &masks)?;

    println!("\n=== Training Complete ===");
    println!("Episodes: {}", result.scores.len());
    println!("Best score: {}", result.best());
    println!("Mean score: {:.2}", result.mean());
    println!("States learned: {}", bot.q_table().len());
    println!("Value table saved to: {}", args.qvalues.display());

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: SummaryStats {
                episodes: result.scores.len(),
                best_score: result.best(),
                mean_score: result.mean(),
            },
            scores: result.scores.clone(),
            metadata: SummaryMetadata {
                qvalues: args.qvalues.display().to_string(),
                states: bot.q_table().len(),
                learning_rate: args.learning_rate,
                discount: args.discount,
                flush_interval: args.flush_interval,
                seed: args.seed,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
