//! Player state: look angles, stamina, movement with wall sliding
//!
//! Input devices are not read here. The host loop hands over a planar
//! movement intent (already camera-relative) and a sprint flag; this
//! module only applies them to the world.

use macroquad::math::{Vec2, Vec3};

use crate::collision::ColliderSet;
use crate::config::Tuning;

/// Camera height above the floor
pub const EYE_HEIGHT: f32 = 1.7;

/// Per-tick movement request from the input layer
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    /// World-space planar direction, unit length or zero
    pub dir: Vec2,
    pub sprint: bool,
}

/// What one movement tick produced
#[derive(Debug, Clone, Copy)]
pub struct PlayerTick {
    pub footstep: bool,
}

pub struct Player {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub stamina: f32,
    pub sprinting: bool,
    /// Head-bob camera offset, eased back to zero when idle
    pub bob_offset: f32,
    /// Cleared when stamina empties; sprint stays locked until the
    /// key is released
    can_sprint: bool,
    bob_phase: f32,
    step_played: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            stamina: 100.0,
            sprinting: false,
            bob_offset: 0.0,
            can_sprint: true,
            bob_phase: 0.0,
            step_played: false,
        }
    }

    /// Apply a mouse-look delta (pixels)
    pub fn look(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-1.5, 1.5);
    }

    /// Unit view direction from yaw/pitch; yaw zero looks down -Z
    pub fn facing(&self) -> Vec3 {
        let (ys, yc) = self.yaw.sin_cos();
        let (ps, pc) = self.pitch.sin_cos();
        Vec3::new(-ys * pc, ps, -yc * pc)
    }

    /// Rotate a key-relative intent (x strafe, y forward along -Z)
    /// into world space by the current yaw
    pub fn world_intent(&self, local: Vec2) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(local.x * c + local.y * s, -local.x * s + local.y * c)
    }

    pub fn update(
        &mut self,
        intent: MoveIntent,
        colliders: &ColliderSet,
        t: &Tuning,
        dt: f32,
    ) -> PlayerTick {
        // Sprint latch: an empty tank locks sprint until the key is
        // let go, so holding shift can't stutter at zero stamina
        if !intent.sprint {
            self.can_sprint = true;
        }
        let mut sprint = intent.sprint && self.can_sprint && self.stamina > 0.0;
        if self.stamina <= 0.0 {
            sprint = false;
            self.can_sprint = false;
        }
        self.sprinting = sprint;
        self.stamina = (self.stamina
            + if sprint { -t.stamina_drain } else { t.stamina_regen } * dt)
            .clamp(0.0, 100.0);

        let mut footstep = false;
        if intent.dir.length_squared() > 0.0 {
            self.bob_phase += dt * if sprint { 16.0 } else { 10.0 };
            let wave = self.bob_phase.sin();
            self.bob_offset = wave * if sprint { 0.12 } else { 0.06 };
            // One footstep per trough of the bob wave
            if wave < -0.8 && !self.step_played {
                footstep = true;
                self.step_played = true;
            }
            if wave > 0.0 {
                self.step_played = false;
            }
        } else {
            self.bob_offset += (0.0 - self.bob_offset) * (dt * 5.0).min(1.0);
        }

        let speed = if sprint { t.sprint_speed } else { t.walk_speed };
        let prev = self.position;
        self.position.x += intent.dir.x * speed * dt;
        if colliders.hit_test(self.position, t.player_radius) {
            self.position.x = prev.x;
        }
        self.position.z += intent.dir.y * speed * dt;
        if colliders.hit_test(self.position, t.player_radius) {
            self.position.z = prev.z;
        }

        PlayerTick { footstep }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::{vec2, vec3};

    fn walk(dir: Vec2) -> MoveIntent {
        MoveIntent { dir, sprint: false }
    }

    #[test]
    fn unobstructed_walk_covers_speed_dt() {
        let t = Tuning::default();
        let set = ColliderSet::new();
        let mut p = Player::new();
        p.update(walk(vec2(0.0, -1.0)), &set, &t, 0.1);
        assert!((p.position.z - (-t.walk_speed * 0.1)).abs() < 1e-5);
    }

    #[test]
    fn wall_blocks_one_axis_but_not_the_other() {
        let t = Tuning::default();
        let mut set = ColliderSet::new();
        set.register(vec3(1.0, 2.5, 0.0), vec3(1.0, 5.0, 40.0));
        let mut p = Player::new();
        p.update(walk(vec2(1.0, 1.0).normalize()), &set, &t, 0.1);
        assert_eq!(p.position.x, 0.0, "x should revert against the wall");
        assert!(p.position.z > 0.0, "z should slide along the wall");
    }

    #[test]
    fn sprint_drains_then_locks_until_released() {
        let t = Tuning::default();
        let set = ColliderSet::new();
        let mut p = Player::new();
        let run = MoveIntent { dir: vec2(0.0, -1.0), sprint: true };

        // 100 stamina at 18/s: 56 ticks of 0.1s empties the tank
        for _ in 0..56 {
            p.update(run, &set, &t, 0.1);
        }
        assert_eq!(p.stamina, 0.0);

        // Still holding shift: regen resumes but sprint stays locked
        p.update(run, &set, &t, 0.1);
        assert!(!p.sprinting);
        assert!(p.stamina > 0.0);
        p.update(run, &set, &t, 0.1);
        assert!(!p.sprinting);

        // Release, then hold again: sprint is available once more
        p.update(walk(vec2(0.0, -1.0)), &set, &t, 0.1);
        p.update(run, &set, &t, 0.1);
        assert!(p.sprinting);
    }

    #[test]
    fn footsteps_fire_on_bob_troughs() {
        let t = Tuning::default();
        let set = ColliderSet::new();
        let mut p = Player::new();
        let mut steps = 0;
        // Two seconds of walking at 10 rad/s bob: ~3 full waves
        for _ in 0..125 {
            if p.update(walk(vec2(1.0, 0.0)), &set, &t, 0.016).footstep {
                steps += 1;
            }
        }
        assert!((2..=4).contains(&steps), "expected ~3 footsteps, got {}", steps);
    }

    #[test]
    fn idle_eases_the_bob_back_down() {
        let t = Tuning::default();
        let set = ColliderSet::new();
        let mut p = Player::new();
        for _ in 0..30 {
            p.update(walk(vec2(1.0, 0.0)), &set, &t, 0.016);
        }
        for _ in 0..120 {
            p.update(walk(Vec2::ZERO), &set, &t, 0.016);
        }
        assert!(p.bob_offset.abs() < 0.005);
    }

    #[test]
    fn world_intent_rotates_with_yaw() {
        let mut p = Player::new();
        // Facing -Z: pressing forward moves along -Z
        let fwd = p.world_intent(vec2(0.0, -1.0));
        assert!((fwd.x).abs() < 1e-6 && (fwd.y - -1.0).abs() < 1e-6);
        // Quarter turn left: forward now points along -X
        p.yaw = std::f32::consts::FRAC_PI_2;
        let fwd = p.world_intent(vec2(0.0, -1.0));
        assert!((fwd.x - -1.0).abs() < 1e-6 && fwd.y.abs() < 1e-6);
    }
}
