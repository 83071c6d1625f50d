//! Episode driver - runs a single game life under agent control.
//!
//! The driver owns the per-episode control flow as an explicit phase machine:
//! it starts a fresh world, feeds one observation per tick to the agent,
//! relays flap decisions back into the physics, and on the first crash hands
//! the episode to the agent's backward value update.

use crate::{
    Result,
    agent::Bot,
    game::{CrashKind, GameWorld, HitmaskStore},
    types::Action,
};

/// Phases of a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpisodePhase {
    /// World constructed, no tick processed yet.
    AwaitStart,
    /// Ticking: observe, act, crash-check, score, advance.
    Running,
    /// A crash ended the run.
    Terminated(CrashKind),
}

/// What a finished episode produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOutcome {
    /// Pipe pairs cleared.
    pub score: u32,
    /// How the run ended.
    pub crash: CrashKind,
    /// Ticks survived.
    pub ticks: u64,
}

/// Run one episode to termination.
///
/// A `Some` seed makes the world's pipe sequence reproducible. When `dump` is
/// set, the agent's periodic flush policy runs after the value update;
/// callers that flush on their own schedule pass `false`.
pub fn run_episode(
    bot: &mut Bot,
    masks: &HitmaskStore,
    seed: Option<u64>,
    dump: bool,
) -> Result<EpisodeOutcome> {
    let mut world = GameWorld::new(seed);
    let mut phase = EpisodePhase::AwaitStart;
    let mut score = 0u32;
    let mut ticks = 0u64;

    loop {
        phase = match phase {
            EpisodePhase::AwaitStart => EpisodePhase::Running,
            EpisodePhase::Running => {
                let observation = world.observe();
                let action = bot.act(observation.dx, observation.dy, observation.vel);
                if action == Action::Flap {
                    world.flap();
                }

                match world.check_crash(masks) {
                    Some(kind) => EpisodePhase::Terminated(kind),
                    None => {
                        score += world.count_midpoint_passes();
                        world.advance();
                        ticks += 1;
                        EpisodePhase::Running
                    }
                }
            }
            EpisodePhase::Terminated(crash) => {
                bot.update_scores(dump)?;
                return Ok(EpisodeOutcome { score, crash, ticks });
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, agent::BotConfig};

    fn test_bot() -> Bot {
        Bot::new(
            Box::new(InMemoryRepository::new()),
            "qvalues.json",
            BotConfig::default(),
        )
    }

    #[test]
    fn test_episode_terminates_and_updates_agent() {
        let mut bot = test_bot();
        let masks = HitmaskStore::solid();

        let outcome = run_episode(&mut bot, &masks, Some(42), false).unwrap();

        assert!(outcome.ticks > 0);
        assert_eq!(bot.episodes(), 1);
        assert!(bot.trajectory().is_empty());
        // An untrained agent idles into the ground or a pipe well before
        // clearing many pairs.
        assert!(outcome.ticks < 10_000);
    }

    #[test]
    fn test_seeded_episodes_are_reproducible() {
        let masks = HitmaskStore::solid();

        let mut bot_a = test_bot();
        let outcome_a = run_episode(&mut bot_a, &masks, Some(7), false).unwrap();

        let mut bot_b = test_bot();
        let outcome_b = run_episode(&mut bot_b, &masks, Some(7), false).unwrap();

        assert_eq!(outcome_a, outcome_b);
        assert_eq!(bot_a.q_table().len(), bot_b.q_table().len());
    }

    #[test]
    fn test_episode_grows_the_value_table() {
        let mut bot = test_bot();
        let masks = HitmaskStore::solid();
        assert_eq!(bot.q_table().len(), 1);

        run_episode(&mut bot, &masks, Some(1), false).unwrap();
        assert!(bot.q_table().len() > 1);
    }
}
