//! One playthrough: the per-tick simulation orchestrator
//!
//! A session owns the streamer, the stalker, the player and the state
//! machine, and advances them in a fixed order once per rendered
//! frame: stalker first (a capture must beat anything later in the
//! same tick), then player movement, the pickup scan, the exit and
//! countdown checks, and finally the streaming window. Discrete
//! happenings are queued as `FrameEvent`s for the host loop to drain
//! into the audio layer; nothing here knows how a cue sounds.

use macroquad::math::Vec3;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Tuning;
use crate::player::{MoveIntent, Player};
use crate::stalker::{spawn_position, Stalker};
use crate::state::GameState;
use crate::world::{ChunkCoord, WorldStreamer};

/// Where the exit structure always appears
pub const EXIT_POS: Vec3 = Vec3::ZERO;

/// Something that happened this tick, drained by the host loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    FragmentCollected,
    ExitSpawned,
    Footstep,
    Lost,
    Won,
}

pub struct Session {
    pub tuning: Tuning,
    pub world: WorldStreamer,
    pub stalker: Stalker,
    pub player: Player,
    pub state: GameState,
    events: Vec<FrameEvent>,
    stress: f32,
}

impl Session {
    /// New session with ambient randomness (normal play)
    pub fn new(tuning: Tuning) -> Self {
        Self::with_rng(tuning, SmallRng::from_entropy())
    }

    /// New session with an injected RNG, for reproducible tests
    pub fn with_rng(tuning: Tuning, rng: SmallRng) -> Self {
        let mut world = WorldStreamer::new(tuning.clone(), rng);

        // The spawn ring must land on generated ground, so the first
        // window is built before the stalker is placed
        world.ensure_window(ChunkCoord::ORIGIN, tuning.stream_radius, true);

        let player = Player::new();
        let spawn = spawn_position(player.position, &world.colliders, &mut world.rng, &tuning);
        let stalker = Stalker::new(spawn);

        Self {
            state: GameState::new(&tuning),
            tuning,
            world,
            stalker,
            player,
            events: Vec::new(),
            stress: 0.0,
        }
    }

    /// Continuous pursuit-stress cue, refreshed every tick
    pub fn pursuit_stress(&self) -> f32 {
        self.stress
    }

    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the simulation by one frame's delta time.
    pub fn tick(&mut self, intent: MoveIntent, dt: f32) {
        // Large deltas (backgrounded window) would tunnel through
        // walls and skip the capture and timer thresholds
        let dt = dt.min(self.tuning.dt_clamp);

        if self.state.is_over() {
            return;
        }

        let stalker_tick = self.stalker.update(
            self.player.position,
            self.player.facing(),
            &self.world.colliders,
            &self.tuning,
            dt,
        );
        self.stress = stalker_tick.stress;
        if stalker_tick.captured {
            self.state.capture();
            self.events.push(FrameEvent::Lost);
            return;
        }

        let player_tick = self.player.update(intent, &self.world.colliders, &self.tuning, dt);
        if player_tick.footstep {
            self.events.push(FrameEvent::Footstep);
        }

        let picked = self
            .world
            .collect_fragments(self.player.position, self.tuning.pickup_radius);
        for _ in 0..picked {
            self.events.push(FrameEvent::FragmentCollected);
        }
        if self.state.record_pickups(picked) {
            self.world.spawn_exit(EXIT_POS);
            self.events.push(FrameEvent::ExitSpawned);
        }

        if self.state.tick_countdown(dt) {
            self.events.push(FrameEvent::Lost);
        }
        if self
            .state
            .try_escape(self.player.position, EXIT_POS, self.tuning.win_radius)
        {
            self.events.push(FrameEvent::Won);
        }

        let anchor = ChunkCoord::from_world(self.player.position, self.tuning.chunk_size);
        let allow_fragments = !self.state.exit_spawned
            && self.state.fragments_collected < self.tuning.fragment_goal;
        self.world
            .ensure_window(anchor, self.tuning.stream_radius, allow_fragments);
        self.world.evict_outside(anchor, self.tuning.stream_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::{vec2, vec3};
    use crate::state::Outcome;
    use crate::world::Fragment;

    fn session(seed: u64) -> Session {
        Session::with_rng(Tuning::default(), SmallRng::seed_from_u64(seed))
    }

    fn idle() -> MoveIntent {
        MoveIntent::default()
    }

    /// Drop the whole fragment goal at the player's feet and collect
    /// it in one tick
    fn force_collect_goal(s: &mut Session) {
        let goal = s.tuning.fragment_goal;
        for _ in 0..goal {
            s.world.fragments.push(Fragment {
                position: s.player.position,
                owner: ChunkCoord::ORIGIN,
            });
        }
        s.tick(idle(), 0.016);
        assert_eq!(s.state.fragments_collected, goal);
    }

    #[test]
    fn initial_window_is_resident_and_stalker_clear() {
        let s = session(1);
        assert_eq!(s.world.resident_count(), 49);
        let d = s.stalker.position.distance(s.player.position);
        assert!(d >= s.tuning.spawn_min_dist, "stalker spawned too close: {}", d);
    }

    #[test]
    fn window_follows_the_player() {
        let mut s = session(2);
        // Teleport the player far east; one tick restreams around them
        s.player.position = vec3(200.0, 0.0, 0.0);
        s.stalker.position = vec3(220.0, 0.0, 0.0);
        s.tick(idle(), 0.016);
        let anchor = ChunkCoord::from_world(s.player.position, s.tuning.chunk_size);
        assert!(s.world.is_resident(anchor));
        assert_eq!(s.world.resident_count(), 49);
        assert!(!s.world.is_resident(ChunkCoord::ORIGIN));
    }

    #[test]
    fn collecting_the_goal_spawns_the_exit_once() {
        let mut s = session(3);
        force_collect_goal(&mut s);
        assert!(s.state.exit_spawned);
        assert_eq!(s.world.exit, Some(EXIT_POS));
        let events: Vec<_> = s.drain_events();
        let spawns = events.iter().filter(|e| **e == FrameEvent::ExitSpawned).count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn countdown_runs_out_to_a_loss() {
        let mut s = session(4);
        force_collect_goal(&mut s);
        // Park the player away from both the exit and the stalker
        s.player.position = vec3(35.0, 0.0, 35.0);
        s.stalker.position = vec3(200.0, 0.0, 200.0);
        let mut simulated = 0.0;
        while !s.state.is_over() {
            // Keep the stalker pinned far away so only the clock acts
            s.stalker.position = s.player.position + vec3(100.0, 0.0, 0.0);
            s.tick(idle(), 0.1);
            simulated += 0.1;
            assert!(simulated < 120.0, "countdown never resolved");
        }
        assert_eq!(s.state.outcome, Some(Outcome::Lost));
        assert!(s.drain_events().contains(&FrameEvent::Lost));
        assert!(simulated > 85.0, "the clock resolved far too early");
    }

    #[test]
    fn reaching_the_exit_wins() {
        let mut s = session(5);
        force_collect_goal(&mut s);
        s.stalker.position = vec3(200.0, 0.0, 200.0);
        s.player.position = vec3(1.0, 0.0, 0.0);
        s.tick(idle(), 0.016);
        assert_eq!(s.state.outcome, Some(Outcome::Won));
        assert!(s.drain_events().contains(&FrameEvent::Won));
    }

    #[test]
    fn capture_overrides_a_win_in_the_same_tick() {
        let mut s = session(6);
        force_collect_goal(&mut s);
        // Player is standing on the exit, but the stalker is on top
        // of the player: the earlier capture must take the tick
        s.player.position = vec3(0.5, 0.0, 0.0);
        s.stalker.position = vec3(0.5, 0.0, 0.5);
        s.tick(idle(), 0.016);
        assert_eq!(s.state.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn capture_loses_while_still_exploring() {
        let mut s = session(7);
        s.stalker.position = s.player.position + vec3(0.5, 0.0, 0.0);
        s.tick(idle(), 0.016);
        assert_eq!(s.state.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn terminal_state_freezes_the_simulation() {
        let mut s = session(8);
        s.stalker.position = s.player.position + vec3(0.5, 0.0, 0.0);
        s.tick(idle(), 0.016);
        assert!(s.state.is_over());
        s.drain_events();

        let stalker_pos = s.stalker.position;
        let residents = s.world.resident_count();
        s.player.position = vec3(500.0, 0.0, 0.0);
        s.tick(MoveIntent { dir: vec2(1.0, 0.0), sprint: false }, 0.016);
        assert_eq!(s.stalker.position, stalker_pos);
        assert_eq!(s.world.resident_count(), residents);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn delta_time_is_clamped() {
        let mut s = session(9);
        s.stalker.position = vec3(200.0, 0.0, 200.0);
        let before = s.player.position;
        // A 5-second hitch must not move the player 5 seconds worth
        s.tick(MoveIntent { dir: vec2(0.0, -1.0), sprint: false }, 5.0);
        let moved = s.player.position.distance(before);
        assert!(moved <= s.tuning.walk_speed * s.tuning.dt_clamp + 1e-4);
    }

    #[test]
    fn fragment_count_and_events_stay_in_step() {
        let mut s = session(10);
        s.stalker.position = vec3(300.0, 0.0, 300.0);
        s.world.fragments.push(Fragment {
            position: s.player.position,
            owner: ChunkCoord::ORIGIN,
        });
        let global_before = s.world.fragments.len();
        s.tick(idle(), 0.016);
        assert_eq!(s.state.fragments_collected, 1);
        assert_eq!(s.world.fragments.len(), global_before - 1);
        let events = s.drain_events();
        assert_eq!(
            events.iter().filter(|e| **e == FrameEvent::FragmentCollected).count(),
            1
        );
    }
}
