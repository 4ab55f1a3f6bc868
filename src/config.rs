//! Gameplay tuning constants
//!
//! Every empirically tuned number lives here as a named field, so the
//! simulation code never carries inline magic values. The defaults are
//! the shipped balance; a RON file can override any subset of them.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Error type for tuning-file loading
#[derive(Debug)]
pub enum TuningError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for TuningError {
    fn from(e: ron::error::SpannedError) -> Self {
        TuningError::ParseError(e)
    }
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::IoError(e) => write!(f, "IO error: {}", e),
            TuningError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

/// All gameplay tuning in one place.
///
/// The stalker/player radius split and the turn rate interact: the
/// stalker turns faster than it moves and hugs corners the player
/// bounces off, which is what makes it read as relentless.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Side length of one maze chunk, world units
    pub chunk_size: f32,
    /// Streaming window radius in chunks (Chebyshev)
    pub stream_radius: i32,
    /// Walls rolled per chunk (inclusive range)
    pub min_walls: u32,
    pub max_walls: u32,
    pub wall_height: f32,
    /// Long-axis length range of a wall segment
    pub wall_min_len: f32,
    pub wall_max_len: f32,
    /// Short-axis thickness of a wall segment
    pub wall_thin: f32,
    /// Half-extent of the wall-free zone around the world origin
    pub safe_zone: f32,
    /// Chance for a chunk to hold a fragment
    pub fragment_chance: f64,
    /// Hover height of a fragment above the floor
    pub fragment_height: f32,
    /// Fragments needed before the exit opens
    pub fragment_goal: u32,
    pub pickup_radius: f32,

    pub player_radius: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Stamina drained per second while sprinting
    pub stamina_drain: f32,
    /// Stamina regained per second otherwise
    pub stamina_regen: f32,
    pub mouse_sensitivity: f32,

    pub stalker_speed: f32,
    /// Smaller than the player's radius so the stalker slides along
    /// walls the player would catch on
    pub stalker_radius: f32,
    /// Fraction of the remaining angle turned per second
    pub turn_rate: f32,
    pub capture_radius: f32,
    /// Distance at which pursuit stress reaches zero
    pub stress_range: f32,
    /// Squared displacement below which a tick counts as stuck
    pub stuck_epsilon: f32,
    /// Seconds of no movement before the unstick nudge fires
    pub stuck_limit: f32,
    /// Nudge distance toward the player, collision ignored
    pub stuck_nudge: f32,

    pub spawn_min_dist: f32,
    pub spawn_max_dist: f32,
    /// Clearance radius required at a candidate spawn point
    pub spawn_clearance: f32,
    pub spawn_attempts: u32,
    /// Fallback offset on +X when no clear spawn point is found
    pub spawn_fallback: f32,

    /// Seconds on the clock once the exit opens
    pub escape_time: f32,
    pub win_radius: f32,
    /// Upper bound on a single tick's delta time
    pub dt_clamp: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            chunk_size: 10.0,
            stream_radius: 3,
            min_walls: 3,
            max_walls: 7,
            wall_height: 5.0,
            wall_min_len: 2.0,
            wall_max_len: 6.0,
            wall_thin: 1.0,
            safe_zone: 3.0,
            fragment_chance: 0.15,
            fragment_height: 1.2,
            fragment_goal: 5,
            pickup_radius: 1.5,

            player_radius: 0.5,
            walk_speed: 5.5,
            sprint_speed: 10.0,
            stamina_drain: 18.0,
            stamina_regen: 35.0,
            mouse_sensitivity: 0.002,

            stalker_speed: 6.0,
            stalker_radius: 0.25,
            turn_rate: 8.0,
            capture_radius: 1.2,
            stress_range: 20.0,
            stuck_epsilon: 1e-4,
            stuck_limit: 1.0,
            stuck_nudge: 0.5,

            spawn_min_dist: 15.0,
            spawn_max_dist: 25.0,
            spawn_clearance: 1.0,
            spawn_attempts: 50,
            spawn_fallback: 20.0,

            escape_time: 90.0,
            win_radius: 2.0,
            dt_clamp: 0.1,
        }
    }
}

/// Load tuning overrides from a RON file
pub fn load_tuning<P: AsRef<Path>>(path: P) -> Result<Tuning, TuningError> {
    let contents = fs::read_to_string(path)?;
    let tuning: Tuning = ron::from_str(&contents)?;
    Ok(tuning)
}
