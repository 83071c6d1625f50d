//! Tabular Q-learning trainer for a Flappy-Bird-style obstacle game
//!
//! This crate provides:
//! - A deterministic, headless game simulation with pixel-accurate collisions
//! - A tabular Q-learning agent with end-of-episode backward value updates
//! - JSON persistence for the learned value table with a periodic flush policy
//! - A training pipeline with pluggable observers and a CLI front end

pub mod adapters;
pub mod agent;
pub mod cli;
pub mod error;
pub mod game;
pub mod pipeline;
pub mod ports;
pub mod types;

pub use agent::{Bot, BotConfig, QTable};
pub use error::{Error, Result};
pub use game::{CrashKind, GameWorld, HitmaskStore};
pub use pipeline::{TrainingConfig, TrainingResult, TrainingSession, run_episode};
pub use types::{Action, StateKey};
