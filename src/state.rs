//! Game state machine: collect, escape, resolve
//!
//! Exploring until five fragments are held, then a timed escape to the
//! exit, ending in a win or a loss. All transitions are polled once per
//! tick and the outcome is write-once: the first terminal transition
//! sticks and every later mutation call becomes a no-op.

use macroquad::math::Vec3;

use crate::config::Tuning;

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub fragments_collected: u32,
    pub exit_spawned: bool,
    /// Seconds left to escape; only ticks down once the exit is open
    pub time_left: f32,
    pub outcome: Option<Outcome>,
    fragment_goal: u32,
}

impl GameState {
    pub fn new(t: &Tuning) -> Self {
        Self {
            fragments_collected: 0,
            exit_spawned: false,
            time_left: t.escape_time,
            outcome: None,
            fragment_goal: t.fragment_goal,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Credit collected fragments. Returns true exactly once: on the
    /// call that reaches the goal, which is the moment the exit must
    /// be spawned and the countdown armed.
    pub fn record_pickups(&mut self, count: u32) -> bool {
        if self.is_over() || count == 0 {
            return false;
        }
        self.fragments_collected += count;
        if self.fragments_collected >= self.fragment_goal && !self.exit_spawned {
            self.exit_spawned = true;
            return true;
        }
        false
    }

    /// Advance the escape countdown. Returns true if time just ran out
    /// and the session resolved to a loss.
    pub fn tick_countdown(&mut self, dt: f32) -> bool {
        if self.is_over() || !self.exit_spawned {
            return false;
        }
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.outcome = Some(Outcome::Lost);
            return true;
        }
        false
    }

    /// The stalker reached the player. Loses from any non-terminal
    /// state, and takes priority over a win pending later in the tick.
    pub fn capture(&mut self) {
        if !self.is_over() {
            self.outcome = Some(Outcome::Lost);
        }
    }

    /// Win if the player stands at the open exit. Returns true on the
    /// resolving call.
    pub fn try_escape(&mut self, player_pos: Vec3, exit_pos: Vec3, win_radius: f32) -> bool {
        if self.is_over() || !self.exit_spawned {
            return false;
        }
        if player_pos.distance(exit_pos) < win_radius {
            self.outcome = Some(Outcome::Won);
            return true;
        }
        false
    }
}
