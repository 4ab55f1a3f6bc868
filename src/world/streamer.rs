//! Chunk streaming around a moving anchor
//!
//! The streamer is the single writer for the residency map, the global
//! collider registry and the global fragment list. Chunk layouts are
//! rolled from the injected RNG at residency time and never stored:
//! revisiting an evicted coordinate produces a fresh layout, which is a
//! deliberate property of the design (chunk identity carries no seed).

use std::collections::HashMap;

use macroquad::math::Vec3;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::collision::ColliderSet;
use crate::config::Tuning;
use super::{Chunk, ChunkCoord, Fragment, Wall};

pub struct WorldStreamer {
    tuning: Tuning,
    chunks: HashMap<ChunkCoord, Chunk>,
    pub colliders: ColliderSet,
    pub fragments: Vec<Fragment>,
    /// Where the exit structure stands, once spawned
    pub exit: Option<Vec3>,
    pub(crate) rng: SmallRng,
}

impl WorldStreamer {
    pub fn new(tuning: Tuning, rng: SmallRng) -> Self {
        Self {
            tuning,
            chunks: HashMap::new(),
            colliders: ColliderSet::new(),
            fragments: Vec::new(),
            exit: None,
            rng,
        }
    }

    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn resident_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Generate every missing chunk within Chebyshev `radius` of the
    /// anchor. `allow_fragments` is false once the collection goal is
    /// met or the exit has spawned.
    pub fn ensure_window(&mut self, anchor: ChunkCoord, radius: i32, allow_fragments: bool) {
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = ChunkCoord::new(anchor.x + dx, anchor.z + dz);
                if !self.chunks.contains_key(&coord) {
                    let chunk = self.generate_chunk(coord, allow_fragments);
                    self.chunks.insert(coord, chunk);
                }
            }
        }
    }

    /// Destroy every chunk outside the window, releasing its colliders
    /// and fragment from the global sets.
    pub fn evict_outside(&mut self, anchor: ChunkCoord, radius: i32) {
        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| c.chebyshev(anchor) > radius)
            .copied()
            .collect();
        for coord in stale {
            if let Some(chunk) = self.chunks.remove(&coord) {
                for id in chunk.collider_ids {
                    self.colliders.remove(id);
                }
                if chunk.has_fragment {
                    self.fragments.retain(|f| f.owner != coord);
                }
            }
        }
    }

    /// Roll one chunk's layout: floor, 3..=7 wall segments, maybe a
    /// fragment at the center.
    fn generate_chunk(&mut self, coord: ChunkCoord, allow_fragments: bool) -> Chunk {
        let t = self.tuning.clone();
        let center = coord.world_center(t.chunk_size);
        let mut chunk = Chunk::new(coord);

        let wall_count = self.rng.gen_range(t.min_walls..=t.max_walls);
        for _ in 0..wall_count {
            let long = self.rng.gen_range(t.wall_min_len..t.wall_max_len);
            let (w, d) = if self.rng.gen_bool(0.5) {
                (long, t.wall_thin)
            } else {
                (t.wall_thin, long)
            };
            let wx = center.x + (self.rng.gen::<f32>() - 0.5) * t.chunk_size;
            let wz = center.z + (self.rng.gen::<f32>() - 0.5) * t.chunk_size;

            // Keep the spawn area at the world origin walkable
            if wx.abs() < t.safe_zone && wz.abs() < t.safe_zone {
                continue;
            }

            let wall = Wall {
                center: Vec3::new(wx, t.wall_height * 0.5, wz),
                size: Vec3::new(w, t.wall_height, d),
            };
            let id = self.colliders.register(wall.center, wall.size);
            chunk.walls.push(wall);
            chunk.collider_ids.push(id);
        }

        if allow_fragments
            && coord != ChunkCoord::ORIGIN
            && self.rng.gen_bool(t.fragment_chance)
        {
            chunk.has_fragment = true;
            self.fragments.push(Fragment {
                position: Vec3::new(center.x, t.fragment_height, center.z),
                owner: coord,
            });
        }

        chunk
    }

    /// Proximity scan of the global fragment list. Each hit is removed
    /// from both the list and its owning chunk before the scan moves
    /// on, so a fragment can never be collected twice. Returns how many
    /// were picked up this tick.
    pub fn collect_fragments(&mut self, player_pos: Vec3, radius: f32) -> u32 {
        let mut collected = 0;
        // Downward scan keeps remaining indices valid across removals
        for i in (0..self.fragments.len()).rev() {
            if self.fragments[i].position.distance(player_pos) < radius {
                let fragment = self.fragments.remove(i);
                if let Some(chunk) = self.chunks.get_mut(&fragment.owner) {
                    chunk.has_fragment = false;
                }
                collected += 1;
            }
        }
        collected
    }

    /// Record the exit structure. The state machine guarantees this is
    /// reached exactly once per session.
    pub fn spawn_exit(&mut self, pos: Vec3) {
        self.exit = Some(pos);
    }
}
