//! Built-in observers: a progress bar and a per-episode score log.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Result, error::Error, ports::Observer};

/// Renders a progress bar over the session, with the latest score as the
/// bar's message.
#[derive(Debug, Default)]
pub struct ProgressObserver {
    bar: Option<ProgressBar>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: u64) -> Result<()> {
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes {msg}",
        )
        .map_err(|e| Error::ProgressBarTemplate {
            message: e.to_string(),
        })?
        .progress_chars("#>-");

        let bar = ProgressBar::new(total_episodes);
        bar.set_style(style);
        self.bar = Some(bar);
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: u64, score: u32) -> Result<()> {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("score {score}"));
            bar.inc(1);
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("done");
        }
        Ok(())
    }
}

/// Prints one `episode | score` line per episode, flagging new bests.
#[derive(Debug, Default)]
pub struct VerboseObserver {
    best: u32,
}

impl VerboseObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for VerboseObserver {
    fn on_episode_end(&mut self, episode: u64, score: u32) -> Result<()> {
        if score > self.best {
            self.best = score;
            println!("{episode} | {score} (new best)");
        } else {
            println!("{episode} | {score}");
        }
        Ok(())
    }
}
