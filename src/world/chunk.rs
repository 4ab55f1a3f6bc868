//! Chunk identity and per-chunk contents

use macroquad::math::Vec3;
use crate::collision::ColliderId;

/// Grid coordinate of a chunk (in chunks, not world units)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const ORIGIN: ChunkCoord = ChunkCoord { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position
    pub fn from_world(pos: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_size).floor() as i32,
            z: (pos.z / chunk_size).floor() as i32,
        }
    }

    /// World-space center of this chunk's floor
    pub fn world_center(self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// Chebyshev distance: the streaming window is a square, not a disc
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// A wall segment, kept as a draw descriptor; its collider lives in the
/// global registry under the id stored by the owning chunk.
#[derive(Debug, Clone)]
pub struct Wall {
    pub center: Vec3,
    pub size: Vec3,
}

/// A collectible fragment, tracked in the streamer's global list so the
/// pickup scan is independent of chunk ownership
#[derive(Debug, Clone)]
pub struct Fragment {
    pub position: Vec3,
    pub owner: ChunkCoord,
}

/// One resident cell of the maze
#[derive(Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub walls: Vec<Wall>,
    /// Handles into the global collider registry, released on eviction
    pub collider_ids: Vec<ColliderId>,
    /// True while this chunk's fragment is still uncollected
    pub has_fragment: bool,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            walls: Vec::new(),
            collider_ids: Vec::new(),
            has_fragment: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec3;

    #[test]
    fn world_to_chunk_floors_negatives() {
        assert_eq!(ChunkCoord::from_world(vec3(4.0, 0.0, -4.0), 10.0), ChunkCoord::new(0, -1));
        assert_eq!(ChunkCoord::from_world(vec3(-0.1, 0.0, 0.0), 10.0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world(vec3(25.0, 0.0, 10.0), 10.0), ChunkCoord::new(2, 1));
    }

    #[test]
    fn chebyshev_is_max_of_axes() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev(ChunkCoord::new(3, -1)), 3);
        assert_eq!(a.chebyshev(ChunkCoord::new(-2, -2)), 2);
    }
}
