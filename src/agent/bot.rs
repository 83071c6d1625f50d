//! The Q-learning agent: action selection, trajectory recording, and the
//! end-of-episode backward value update.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    agent::q_table::QTable,
    ports::QTableRepository,
    types::{Action, StateKey},
};

/// Hyperparameters and reward shaping for the agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BotConfig {
    /// Learning rate α
    pub learning_rate: f64,

    /// Discount factor γ
    pub discount: f64,

    /// Per-tick survival reward
    pub tick_reward: f64,

    /// Terminal penalty reward
    pub crash_reward: f64,

    /// Persist the table every this many episodes
    pub flush_interval: u64,

    /// Terminal dy above which a death counts as a ceiling-region death
    pub ceiling_dy_threshold: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.7,
            discount: 1.0,
            tick_reward: 1.0,
            crash_reward: -1000.0,
            flush_interval: 25,
            ceiling_dy_threshold: 120,
        }
    }
}

/// One recorded step of an episode: the state the agent was in, the action it
/// took there, and the state that resulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub result: StateKey,
}

/// Tabular Q-learning agent.
///
/// Owns the value table and the current episode's trajectory for the process
/// lifetime; no hidden shared state. The episode driver feeds it one
/// observation per tick via [`Bot::act`] and triggers the batch update via
/// [`Bot::update_scores`] on termination.
pub struct Bot {
    table: QTable,
    trajectory: Vec<Transition>,
    last_state: StateKey,
    last_action: Action,
    episodes: u64,
    config: BotConfig,
    repository: Box<dyn QTableRepository>,
    table_path: PathBuf,
}

impl Bot {
    /// Create an agent, loading the persisted table from `table_path`.
    ///
    /// A missing or structurally invalid file is a cold start, not an error:
    /// the table is seeded with the canonical starting state and training
    /// proceeds.
    pub fn new(
        repository: Box<dyn QTableRepository>,
        table_path: impl Into<PathBuf>,
        config: BotConfig,
    ) -> Self {
        let table_path = table_path.into();
        let table = match repository.load_raw(&table_path) {
            Ok(raw) => QTable::from_raw_entries(config.learning_rate, config.discount, raw),
            Err(_) => QTable::seeded(config.learning_rate, config.discount),
        };

        Self {
            table,
            trajectory: Vec::new(),
            last_state: StateKey::INITIAL,
            last_action: Action::Idle,
            episodes: 0,
            config,
            repository,
            table_path,
        }
    }

    /// Select the greedy action for the current observation and record the
    /// transition from the previously accepted state.
    ///
    /// Lazily zero-initializes the entry for a newly seen state. Ties break
    /// toward [`Action::Idle`]; this is deliberate policy, not incidental.
    /// Never fails.
    pub fn act(&mut self, dx: f64, dy: f64, vel: i32) -> Action {
        let state = StateKey::discretize(dx, dy, vel);
        self.table.ensure(&state);

        self.trajectory.push(Transition {
            state: self.last_state,
            action: self.last_action,
            result: state,
        });
        self.last_state = state;

        let action = self.table.greedy_action(&state);
        self.last_action = action;
        action
    }

    /// End-of-episode backward pass over the trajectory.
    ///
    /// Walks the transitions in reverse chronological order with a 1-based
    /// counter t. The last two transitions before termination (t = 1, 2)
    /// receive the terminal penalty. When the episode ended in the ceiling
    /// region (terminal dy above the threshold), the most recent flap before
    /// it is also penalized, once. Everything else receives the per-tick
    /// survival reward. Updates run in strict reverse order so later
    /// transitions' fresh values feed earlier ones' targets in a single pass.
    ///
    /// Increments the episode counter, clears the trajectory, and (unless
    /// `dump` is false) runs the periodic flush policy. An empty trajectory
    /// is a no-op.
    pub fn update_scores(&mut self, dump: bool) -> Result<()> {
        if self.trajectory.is_empty() {
            return Ok(());
        }

        let history = std::mem::take(&mut self.trajectory);
        let terminal = history
            .last()
            .map(|transition| transition.result)
            .unwrap_or(StateKey::INITIAL);
        let mut high_death = terminal.dy() > self.config.ceiling_dy_threshold;

        for (offset, transition) in history.iter().rev().enumerate() {
            let t = offset + 1;
            let reward = if t <= 2 {
                self.config.crash_reward
            } else if high_death && transition.action == Action::Flap {
                high_death = false;
                self.config.crash_reward
            } else {
                self.config.tick_reward
            };

            self.table
                .td_update(&transition.state, transition.action, reward, &transition.result);
        }

        self.episodes += 1;
        if dump {
            self.flush(false)?;
        }
        Ok(())
    }

    /// Periodic flush policy: persist the table when the episode counter is
    /// an exact multiple of the flush interval, or unconditionally when
    /// `force` is set (process shutdown, episode target reached).
    ///
    /// Returns whether the table was persisted.
    pub fn flush(&self, force: bool) -> Result<bool> {
        if force || self.episodes.is_multiple_of(self.config.flush_interval) {
            self.repository.save(&self.table, &self.table_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// The value table.
    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    /// Episodes completed so far.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Transitions recorded in the current episode.
    pub fn trajectory(&self) -> &[Transition] {
        &self.trajectory
    }

    /// Agent configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }
}
