//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Horizontal distance below which the fine dx grid applies.
pub const DX_NEAR_THRESHOLD: f64 = 140.0;
/// Fine dx grid step, used close to the tracked pipe where timing matters.
pub const DX_FINE_STEP: i64 = 10;
/// Coarse dx grid step, used far from the tracked pipe.
pub const DX_COARSE_STEP: i64 = 70;

/// Vertical distance below which the fine dy grid applies.
pub const DY_NEAR_THRESHOLD: f64 = 180.0;
/// Fine dy grid step.
pub const DY_FINE_STEP: i64 = 10;
/// Coarse dy grid step.
pub const DY_COARSE_STEP: i64 = 60;

/// The two actions available to the agent each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Do nothing and let gravity act.
    Idle,
    /// Flap, setting the vertical velocity to the fixed upward impulse.
    Flap,
}

impl Action {
    /// Index into a two-element action-value array.
    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Flap => 1,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Idle => write!(f, "idle"),
            Action::Flap => write!(f, "flap"),
        }
    }
}

/// Discretized state identifier: bucketed horizontal and vertical offsets to
/// the tracked pipe's gap, plus the raw vertical velocity.
///
/// Serialized as the composite key `"{dx}_{dy}_{vel}"`, which is also the key
/// format of the persisted value table. Two observations map to the same key
/// exactly when they fall in the same (dx bucket, dy bucket, velocity) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    dx: i64,
    dy: i64,
    vel: i32,
}

/// Bucket a continuous offset: truncate toward zero, then snap down to the
/// nearest multiple of the grid step (floor semantics on negatives, so e.g.
/// -33 snaps to -40 on the fine grid, matching the persisted key format).
fn bucket(value: f64, near_threshold: f64, fine_step: i64, coarse_step: i64) -> i64 {
    let step = if value < near_threshold {
        fine_step
    } else {
        coarse_step
    };
    let truncated = value.trunc() as i64;
    truncated - truncated.rem_euclid(step)
}

impl StateKey {
    /// Canonical starting state, also the single seeded entry of a cold-start
    /// value table.
    pub const INITIAL: StateKey = StateKey {
        dx: 420,
        dy: 240,
        vel: 0,
    };

    /// Discretize a raw observation into a state key.
    ///
    /// `dx` and `dy` are the horizontal and vertical offsets to the tracked
    /// pipe's lower-gap corner; `vel` is the current vertical velocity and is
    /// kept unbucketed.
    pub fn discretize(dx: f64, dy: f64, vel: i32) -> Self {
        StateKey {
            dx: bucket(dx, DX_NEAR_THRESHOLD, DX_FINE_STEP, DX_COARSE_STEP),
            dy: bucket(dy, DY_NEAR_THRESHOLD, DY_FINE_STEP, DY_COARSE_STEP),
            vel,
        }
    }

    /// Parse a composite key back into its components.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] when the key does not have
    /// three `_`-separated integer fields.
    pub fn parse(key: &str) -> crate::Result<Self> {
        let invalid = || crate::Error::InvalidStateKey {
            key: key.to_string(),
        };

        let mut parts = key.split('_');
        let dx = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let dy = parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let vel = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(StateKey { dx, dy, vel })
    }

    /// Bucketed horizontal offset.
    pub fn dx(&self) -> i64 {
        self.dx
    }

    /// Bucketed vertical offset. Drives the ceiling-death attribution in the
    /// episode-end update.
    pub fn dy(&self) -> i64 {
        self.dy
    }

    /// Raw vertical velocity.
    pub fn vel(&self) -> i32 {
        self.vel
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.dx, self.dy, self.vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discretization_is_deterministic() {
        let a = StateKey::discretize(133.7, -42.9, -8);
        let b = StateKey::discretize(133.7, -42.9, -8);
        assert_eq!(a, b);
    }

    #[test]
    fn discretization_is_monotonic_within_regime() {
        // Fine régime for dx (< 140)
        let mut previous = i64::MIN;
        for raw in -400..140 {
            let key = StateKey::discretize(raw as f64, 0.0, 0);
            assert!(key.dx() >= previous, "dx bucket regressed at {raw}");
            previous = key.dx();
        }

        // Coarse régime for dx (>= 140)
        let mut previous = i64::MIN;
        for raw in 140..500 {
            let key = StateKey::discretize(raw as f64, 0.0, 0);
            assert!(key.dx() >= previous, "dx bucket regressed at {raw}");
            previous = key.dx();
        }
    }

    #[test]
    fn negative_offsets_snap_downward() {
        // Floor semantics: -33 is in the [-40, -30) cell, not [-30, -20).
        assert_eq!(StateKey::discretize(-33.0, 0.0, 0).dx(), -40);
        assert_eq!(StateKey::discretize(0.0, -33.0, 0).dy(), -40);
        // Truncation toward zero happens before snapping.
        assert_eq!(StateKey::discretize(-33.5, 0.0, 0).dx(), -40);
    }

    #[test]
    fn coarse_regime_uses_wide_steps() {
        assert_eq!(StateKey::discretize(140.0, 0.0, 0).dx(), 140);
        assert_eq!(StateKey::discretize(209.0, 0.0, 0).dx(), 140);
        assert_eq!(StateKey::discretize(210.0, 0.0, 0).dx(), 210);
        assert_eq!(StateKey::discretize(0.0, 180.0, 0).dy(), 180);
        assert_eq!(StateKey::discretize(0.0, 239.0, 0).dy(), 180);
    }

    #[test]
    fn distinct_buckets_never_alias() {
        let a = StateKey::discretize(10.0, 20.0, -1);
        let b = StateKey::discretize(20.0, 10.0, -1);
        let c = StateKey::discretize(10.0, 20.0, 1);
        assert_ne!(a.to_string(), b.to_string());
        assert_ne!(a.to_string(), c.to_string());
    }

    #[test]
    fn key_roundtrips_through_string() {
        let key = StateKey::discretize(133.0, -42.0, -8);
        let parsed = StateKey::parse(&key.to_string()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert!(StateKey::parse("420_240").is_err());
        assert!(StateKey::parse("420_240_0_7").is_err());
        assert!(StateKey::parse("a_b_c").is_err());
        assert!(StateKey::parse("").is_err());
    }

    #[test]
    fn initial_state_matches_seeded_key() {
        assert_eq!(StateKey::INITIAL.to_string(), "420_240_0");
    }
}
