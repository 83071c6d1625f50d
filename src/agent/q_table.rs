//! Value table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, StateKey};

/// Fixed-shape action-value record: one estimate per action `{idle, flap}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionValues(pub [f64; 2]);

impl ActionValues {
    /// Zero-initialized entry, the default for unseen states.
    pub const ZERO: ActionValues = ActionValues([0.0, 0.0]);

    /// Value for a specific action.
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    /// Maximum value over both actions.
    pub fn max(&self) -> f64 {
        self.0[0].max(self.0[1])
    }
}

/// Value table mapping discretized state keys to action values.
///
/// Grows monotonically as novel states are encountered; entries default to
/// zero on first reference. No eviction: unbounded growth over the
/// discretized state space is an accepted characteristic of the tabular
/// approach.
#[derive(Debug, Clone)]
pub struct QTable {
    entries: HashMap<String, ActionValues>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount: f64,
}

impl QTable {
    /// Create an empty table.
    pub fn new(learning_rate: f64, discount: f64) -> Self {
        Self {
            entries: HashMap::new(),
            learning_rate,
            discount,
        }
    }

    /// Create a cold-start table seeded with the canonical starting state.
    pub fn seeded(learning_rate: f64, discount: f64) -> Self {
        let mut table = Self::new(learning_rate, discount);
        table.ensure(&StateKey::INITIAL);
        table
    }

    /// Rebuild a table from raw persisted entries, repairing malformed ones.
    ///
    /// Entries with the wrong arity or non-finite values are reset to zero
    /// rather than rejected; this is the repair-on-read boundary for the
    /// durable format.
    pub fn from_raw_entries(
        learning_rate: f64,
        discount: f64,
        raw: HashMap<String, Vec<f64>>,
    ) -> Self {
        let entries = raw
            .into_iter()
            .map(|(key, values)| {
                let repaired = match values.as_slice() {
                    [idle, flap] if idle.is_finite() && flap.is_finite() => {
                        ActionValues([*idle, *flap])
                    }
                    _ => ActionValues::ZERO,
                };
                (key, repaired)
            })
            .collect();

        Self {
            entries,
            learning_rate,
            discount,
        }
    }

    /// Lazily create a zero-initialized entry for a state.
    pub fn ensure(&mut self, state: &StateKey) {
        self.entries
            .entry(state.to_string())
            .or_insert(ActionValues::ZERO);
    }

    /// Get the action values for a state (zero if unseen).
    pub fn values(&self, state: &StateKey) -> ActionValues {
        self.entries
            .get(&state.to_string())
            .copied()
            .unwrap_or(ActionValues::ZERO)
    }

    /// Maximum action value in a state (zero if unseen).
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.values(state).max()
    }

    /// Greedy action selection with the deliberate tie-break toward [`Action::Idle`]:
    /// idle is chosen whenever its value is greater *or equal*.
    pub fn greedy_action(&self, state: &StateKey) -> Action {
        let values = self.values(state);
        if values.get(Action::Idle) >= values.get(Action::Flap) {
            Action::Idle
        } else {
            Action::Flap
        }
    }

    /// Single-step TD update toward the maximum result-state value:
    ///
    /// Q(s,a) ← (1−α)·Q(s,a) + α·[r + γ·max_a' Q(s',a')]
    ///
    /// A non-finite result is isolated to this state: the entry is reset to
    /// zero and the caller's pass continues unaffected.
    pub fn td_update(&mut self, state: &StateKey, action: Action, reward: f64, result: &StateKey) {
        self.ensure(state);
        self.ensure(result);

        let max_next = self.max_value(result);
        let old = self.values(state).get(action);
        let new = (1.0 - self.learning_rate) * old
            + self.learning_rate * (reward + self.discount * max_next);

        let entry = self
            .entries
            .entry(state.to_string())
            .or_insert(ActionValues::ZERO);
        if new.is_finite() {
            entry.0[action.index()] = new;
        } else {
            *entry = ActionValues::ZERO;
        }
    }

    /// Number of states stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no states are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the table holds an entry for this state.
    pub fn contains(&self, state: &StateKey) -> bool {
        self.entries.contains_key(&state.to_string())
    }

    /// Raw key/value view, used by repositories for the durable format.
    pub fn entries(&self) -> &HashMap<String, ActionValues> {
        &self.entries
    }

    /// Learning rate α.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Discount factor γ.
    pub fn discount(&self) -> f64 {
        self.discount
    }
}
