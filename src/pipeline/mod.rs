//! Training pipeline: the per-episode driver, the multi-episode session,
//! and the built-in observers.

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{EpisodeOutcome, run_episode};
pub use observers::{ProgressObserver, VerboseObserver};
pub use training::{TrainingConfig, TrainingResult, TrainingSession};
