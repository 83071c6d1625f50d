//! Training session - drives episodes in sequence and reports scores.

use crate::{
    Result,
    agent::Bot,
    game::HitmaskStore,
    pipeline::episode::run_episode,
    ports::Observer,
};

/// Session-level parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrainingConfig {
    /// Number of episodes to run.
    pub episodes: u64,
    /// Base seed; episode `i` runs its world with `seed + i`. `None` draws
    /// fresh entropy per episode.
    pub seed: Option<u64>,
}

/// Scores gathered over a finished session.
#[derive(Debug, Clone, Default)]
pub struct TrainingResult {
    pub scores: Vec<u32>,
}

impl TrainingResult {
    pub fn best(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|&s| f64::from(s)).sum::<f64>() / self.scores.len() as f64
    }
}

/// Runs a sequence of episodes against one agent, notifying observers as
/// episodes finish and forcing a final table flush when the session ends.
pub struct TrainingSession {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingSession {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Attach an observer. Builder-style, so callers can chain attachments.
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of episodes.
    ///
    /// The agent's periodic flush policy runs between episodes; a forced
    /// flush at the end guarantees the table survives sessions whose length
    /// is not a multiple of the flush interval.
    pub fn run(&mut self, bot: &mut Bot, masks: &HitmaskStore) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut result = TrainingResult::default();
        for episode in 0..self.config.episodes {
            let seed = self.config.seed.map(|base| base.wrapping_add(episode));
            let outcome = run_episode(bot, masks, seed, true)?;
            result.scores.push(outcome.score);

            for observer in &mut self.observers {
                observer.on_episode_end(episode + 1, outcome.score)?;
            }
        }

        bot.flush(true)?;

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }
        Ok(result)
    }
}
