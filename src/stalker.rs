//! The stalker: the single pursuing enemy
//!
//! Pursuit is a heading-based steering approximation, not pathfinding.
//! The stalker always advances straight at the player, turns faster
//! than it moves, and slides along walls by attempting the X and Z
//! displacements independently. Randomized chunk walls can still wedge
//! it into a pocket, so a stuck timer forces a short unblocking jump
//! toward the player once movement has stalled for a full second.

use std::f32::consts::PI;

use macroquad::math::{Vec2, Vec3};
use rand::Rng;

use crate::collision::ColliderSet;
use crate::config::Tuning;

/// Wrap an angle into [-pi, pi]
fn wrap_angle(mut a: f32) -> f32 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// What one update produced: the capture signal and the continuous
/// pursuit-stress cue forwarded to the audio layer.
#[derive(Debug, Clone, Copy)]
pub struct StalkerTick {
    pub captured: bool,
    pub stress: f32,
}

pub struct Stalker {
    pub position: Vec3,
    /// Facing angle around Y; rendering-side, movement ignores it
    pub yaw: f32,
    pub time_alive: f32,
    /// Cosmetic: true while the player is looking straight at it
    pub trembling: bool,
    stuck_timer: f32,
}

impl Stalker {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            time_alive: 0.0,
            trembling: false,
            stuck_timer: 0.0,
        }
    }

    #[cfg(test)]
    pub(crate) fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    /// One pursuit tick. Order matters: the capture test runs before
    /// any movement, so a capture tick never also moves the agent.
    pub fn update(
        &mut self,
        player_pos: Vec3,
        player_facing: Vec3,
        colliders: &ColliderSet,
        t: &Tuning,
        dt: f32,
    ) -> StalkerTick {
        self.time_alive += dt;

        let to_player = Vec2::new(
            player_pos.x - self.position.x,
            player_pos.z - self.position.z,
        );
        let distance = to_player.length();
        let heading = to_player.normalize_or_zero();

        let stress = (1.0 - distance / t.stress_range).clamp(0.0, 1.0);

        // Being watched makes it shudder, never slow down
        self.trembling =
            player_facing.dot(Vec3::new(-heading.x, 0.0, -heading.y)) > 0.7;

        if distance <= t.capture_radius {
            return StalkerTick { captured: true, stress };
        }

        // Turn a fraction of the remaining angle per second, fast
        // enough that the body visibly snaps around corners
        let target_yaw = heading.x.atan2(heading.y);
        let diff = wrap_angle(target_yaw - self.yaw);
        self.yaw = wrap_angle(self.yaw + diff * t.turn_rate * dt);

        let prev = self.position;
        let step = heading * t.stalker_speed * dt;

        // X and Z attempted independently: a wall blocking one axis
        // still lets the other slide along it
        self.position.x += step.x;
        if colliders.hit_test(self.position, t.stalker_radius) {
            self.position.x = prev.x;
        }
        self.position.z += step.y;
        if colliders.hit_test(self.position, t.stalker_radius) {
            self.position.z = prev.z;
        }

        // Stuck recovery: wedged for over a second means geometry has
        // trapped it; jump half a unit toward the player, collision
        // ignored, and start counting again
        let moved_sq = self.position.distance_squared(prev);
        if moved_sq < t.stuck_epsilon {
            self.stuck_timer += dt;
            if self.stuck_timer > t.stuck_limit {
                self.position.x += heading.x * t.stuck_nudge;
                self.position.z += heading.y * t.stuck_nudge;
                self.stuck_timer = 0.0;
            }
        } else {
            self.stuck_timer = 0.0;
        }

        StalkerTick { captured: false, stress }
    }
}

/// Pick a collision-free spawn point on a ring around the player.
///
/// Bounded attempts with a deterministic fallback: the routine always
/// terminates with a valid position even if every candidate lands
/// inside a wall.
pub fn spawn_position(
    player_pos: Vec3,
    colliders: &ColliderSet,
    rng: &mut impl Rng,
    t: &Tuning,
) -> Vec3 {
    for _ in 0..t.spawn_attempts {
        let angle = rng.gen::<f32>() * 2.0 * PI;
        let dist = rng.gen_range(t.spawn_min_dist..t.spawn_max_dist);
        let candidate = Vec3::new(
            player_pos.x + angle.cos() * dist,
            0.0,
            player_pos.z + angle.sin() * dist,
        );
        if !colliders.hit_test(candidate, t.spawn_clearance) {
            return candidate;
        }
    }
    Vec3::new(player_pos.x + t.spawn_fallback, 0.0, player_pos.z)
}
