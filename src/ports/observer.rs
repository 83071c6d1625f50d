//! Observer port - episode lifecycle notifications during training
//!
//! Observers allow composable data collection during a training session
//! without coupling the episode loop to specific output formats. The core
//! notifies observers but never consults them: training behaves identically
//! whether or not any presentation is attached.

use crate::Result;

/// Observer trait - receives training lifecycle events.
///
/// All methods have no-op defaults, so observers implement only the hooks
/// they care about.
pub trait Observer {
    /// Called once before the first episode.
    fn on_training_start(&mut self, total_episodes: u64) -> Result<()> {
        let _ = total_episodes;
        Ok(())
    }

    /// Called after each terminated episode with its final score.
    fn on_episode_end(&mut self, episode: u64, score: u32) -> Result<()> {
        let _ = (episode, score);
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
