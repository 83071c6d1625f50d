//! Deterministic world model: player kinematics, pipe stream, scoring.
//!
//! One call to [`GameWorld::advance`] is one tick. The caller decides when to
//! flap, asks for an observation, checks for a crash, then advances. All
//! randomness flows through a single seedable generator so a seeded world
//! replays the identical pipe sequence.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::game::{
    collision::{Rect, pixel_collision},
    hitmask::HitmaskStore,
};

pub const SCREEN_WIDTH: i32 = 288;
pub const SCREEN_HEIGHT: i32 = 512;

/// Top of the ground strip. Everything below is unplayable.
pub const BASE_Y: f64 = SCREEN_HEIGHT as f64 * 0.79;

pub const PLAYER_WIDTH: i32 = 34;
pub const PLAYER_HEIGHT: i32 = 24;
pub const PLAYER_FRAME_COUNT: usize = 3;

pub const PIPE_WIDTH: i32 = 52;
pub const PIPE_HEIGHT: i32 = 320;

/// Vertical clearance between an upper and lower pipe.
pub const PIPE_GAP_SIZE: i32 = 100;

/// Fixed horizontal player position.
pub const PLAYER_X: i32 = (SCREEN_WIDTH as f64 * 0.2) as i32;

/// Pipes scroll left at this rate, per tick.
pub const PIPE_VEL_X: f64 = -4.0;

/// Terminal downward velocity.
pub const PLAYER_MAX_VEL_Y: i32 = 10;

/// Gravity, applied per tick while not flapping.
pub const PLAYER_ACC_Y: i32 = 1;

/// Upward impulse a flap resets the velocity to.
pub const PLAYER_FLAP_VEL: i32 = -9;

/// Animation frame sequence, advanced every third tick.
const FRAME_CYCLE: [usize; 4] = [0, 1, 2, 1];

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashKind {
    /// Hit the ground or flew off the top of the screen.
    GroundOrSky,
    /// Pixel-level overlap with a pipe sprite.
    Pipe,
}

/// Raw (continuous) state the agent observes each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Horizontal distance from the player to the tracked lower pipe.
    pub dx: f64,
    /// Vertical distance from the player to the tracked lower pipe's top.
    pub dy: f64,
    /// Current vertical velocity.
    pub vel: i32,
}

/// One upper/lower pipe pair sharing an x position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipePair {
    pub x: f64,
    pub upper_y: i32,
    pub lower_y: i32,
}

impl PipePair {
    fn new(x: f64, gap_y: i32) -> Self {
        Self {
            x,
            upper_y: gap_y - PIPE_HEIGHT,
            lower_y: gap_y + PIPE_GAP_SIZE,
        }
    }
}

/// Complete simulation state for one run.
#[derive(Debug)]
pub struct GameWorld {
    player_y: f64,
    player_vel_y: i32,
    player_flapped: bool,
    player_frame: usize,
    frame_cycle_pos: usize,
    loop_iter: u32,
    pipes: Vec<PipePair>,
    rng: StdRng,
}

impl GameWorld {
    /// Fresh world with the player centered vertically and two pipe pairs
    /// already inbound. A `Some` seed makes the pipe sequence reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let first_gap = Self::random_gap_y(&mut rng);
        let second_gap = Self::random_gap_y(&mut rng);
        let pipes = vec![
            PipePair::new((SCREEN_WIDTH + 200) as f64, first_gap),
            PipePair::new((SCREEN_WIDTH + 200 + SCREEN_WIDTH / 2) as f64, second_gap),
        ];

        Self {
            player_y: ((SCREEN_HEIGHT - PLAYER_HEIGHT) / 2) as f64,
            player_vel_y: PLAYER_FLAP_VEL,
            player_flapped: false,
            player_frame: 0,
            frame_cycle_pos: 0,
            loop_iter: 0,
            pipes,
            rng,
        }
    }

    /// Top of the gap, measured from the top of the screen. Keeps the gap
    /// inside the middle 60% of the playable column.
    fn random_gap_y(rng: &mut StdRng) -> i32 {
        let span = (BASE_Y * 0.6) as i32 - PIPE_GAP_SIZE;
        rng.random_range(0..span) + (BASE_Y * 0.2) as i32
    }

    /// The pipe pair the agent measures distances against: the first pair,
    /// until its trailing edge is about to pass the player, then the next.
    fn tracked_pipe(&self) -> &PipePair {
        if self.pipes[0].x - PLAYER_X as f64 > -30.0 {
            &self.pipes[0]
        } else {
            &self.pipes[1]
        }
    }

    /// Continuous observation for the current tick.
    pub fn observe(&self) -> Observation {
        let pipe = self.tracked_pipe();
        Observation {
            dx: pipe.x - PLAYER_X as f64,
            dy: pipe.lower_y as f64 - self.player_y,
            vel: self.player_vel_y,
        }
    }

    /// Apply an upward impulse, unless the player has already left the top
    /// of the screen.
    pub fn flap(&mut self) {
        if self.player_y > (-2 * PLAYER_HEIGHT) as f64 {
            self.player_vel_y = PLAYER_FLAP_VEL;
            self.player_flapped = true;
        }
    }

    /// Crash check for the current positions, before any movement this tick.
    pub fn check_crash(&self, masks: &HitmaskStore) -> Option<CrashKind> {
        let player_bottom = self.player_y + PLAYER_HEIGHT as f64;
        if player_bottom >= BASE_Y - 1.0 || player_bottom <= 0.0 {
            return Some(CrashKind::GroundOrSky);
        }

        let player_rect = Rect::new(
            PLAYER_X,
            self.player_y as i32,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        );
        let player_mask = masks.player_frame(self.player_frame());

        for pipe in &self.pipes {
            let upper_rect = Rect::new(pipe.x as i32, pipe.upper_y, PIPE_WIDTH, PIPE_HEIGHT);
            let lower_rect = Rect::new(pipe.x as i32, pipe.lower_y, PIPE_WIDTH, PIPE_HEIGHT);

            if pixel_collision(player_rect, upper_rect, player_mask, masks.pipe_upper())
                || pixel_collision(player_rect, lower_rect, player_mask, masks.pipe_lower())
            {
                return Some(CrashKind::Pipe);
            }
        }
        None
    }

    /// Number of pipe midpoints the player crosses this tick. The midpoint
    /// window is the pipe scroll rate wide, so each pair counts exactly once.
    pub fn count_midpoint_passes(&self) -> u32 {
        let player_mid = (PLAYER_X + PLAYER_WIDTH / 2) as f64;
        self.pipes
            .iter()
            .filter(|pipe| {
                let pipe_mid = pipe.x + (PIPE_WIDTH / 2) as f64;
                pipe_mid <= player_mid && player_mid < pipe_mid - PIPE_VEL_X
            })
            .count() as u32
    }

    /// Advance the simulation by one tick: animation, gravity, player
    /// movement clamped at the ground, pipe scroll, spawn, and retirement.
    pub fn advance(&mut self) {
        if (self.loop_iter + 1).is_multiple_of(3) {
            self.player_frame = FRAME_CYCLE[self.frame_cycle_pos];
            self.frame_cycle_pos = (self.frame_cycle_pos + 1) % FRAME_CYCLE.len();
        }
        self.loop_iter = (self.loop_iter + 1) % 30;

        if self.player_vel_y < PLAYER_MAX_VEL_Y && !self.player_flapped {
            self.player_vel_y += PLAYER_ACC_Y;
        }
        self.player_flapped = false;

        let ground_clearance = BASE_Y - self.player_y - PLAYER_HEIGHT as f64;
        self.player_y += (self.player_vel_y as f64).min(ground_clearance);

        for pipe in &mut self.pipes {
            pipe.x += PIPE_VEL_X;
        }

        if 0.0 < self.pipes[0].x && self.pipes[0].x < 5.0 {
            let gap_y = Self::random_gap_y(&mut self.rng);
            self.pipes
                .push(PipePair::new((SCREEN_WIDTH + 10) as f64, gap_y));
        }

        if self.pipes[0].x < -PIPE_WIDTH as f64 {
            self.pipes.remove(0);
        }
    }

    pub fn player_y(&self) -> f64 {
        self.player_y
    }

    pub fn player_vel_y(&self) -> i32 {
        self.player_vel_y
    }

    pub fn player_frame(&self) -> usize {
        self.player_frame
    }

    pub fn pipes(&self) -> &[PipePair] {
        &self.pipes
    }
}
