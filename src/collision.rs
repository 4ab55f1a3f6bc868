//! Wall collision: a flat collider registry with a two-phase boolean query
//!
//! There is deliberately no grid or BVH here. The streaming window keeps
//! the registered collider count small and the broad-phase distance cut
//! keeps the narrow-phase set to the walls immediately around the query
//! point, so a linear scan is plenty.

use macroquad::math::Vec3;

/// Squared planar distance beyond which a collider is not even box-tested
const BROAD_CUTOFF_SQ: f32 = 25.0;

/// Vertical extent of the query volume
const QUERY_HEIGHT: f32 = 2.0;

/// The query volume is lifted to this height so it spans torso, not feet
const QUERY_CENTER_Y: f32 = 1.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Build a box from its center and full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Interval overlap on all three axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
            && self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

/// Handle to a registered collider, stable across removals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(u64);

/// A static wall volume blocking movement
#[derive(Debug, Clone)]
pub struct Collider {
    pub id: ColliderId,
    pub center: Vec3,
    pub bounds: Aabb,
}

/// Flat registry of every resident wall collider.
///
/// Owned by the world streamer; registration and removal happen only
/// there. Everything else sees this as a read-only query surface.
#[derive(Debug, Default)]
pub struct ColliderSet {
    colliders: Vec<Collider>,
    next_id: u64,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a box collider, returning its handle
    pub fn register(&mut self, center: Vec3, size: Vec3) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.push(Collider {
            id,
            center,
            bounds: Aabb::from_center_size(center, size),
        });
        id
    }

    /// Remove a collider by handle. Removal is idempotent per handle
    /// since handles are never reused.
    pub fn remove(&mut self, id: ColliderId) {
        self.colliders.retain(|c| c.id != id);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// True if a vertical box of the given horizontal radius, centered
    /// at `pos`, overlaps any registered collider.
    ///
    /// Pure query: world state is untouched, repeated calls agree.
    pub fn hit_test(&self, pos: Vec3, radius: f32) -> bool {
        let volume = Aabb::from_center_size(
            Vec3::new(pos.x, QUERY_CENTER_Y, pos.z),
            Vec3::new(radius, QUERY_HEIGHT, radius),
        );
        for c in &self.colliders {
            let dx = c.center.x - pos.x;
            let dz = c.center.z - pos.z;
            if dx * dx + dz * dz > BROAD_CUTOFF_SQ {
                continue;
            }
            if volume.overlaps(&c.bounds) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec3;

    fn wall_at(set: &mut ColliderSet, x: f32, z: f32) -> ColliderId {
        set.register(vec3(x, 2.5, z), vec3(2.0, 5.0, 1.0))
    }

    #[test]
    fn hit_inside_wall() {
        let mut set = ColliderSet::new();
        wall_at(&mut set, 0.0, 0.0);
        assert!(set.hit_test(vec3(0.0, 0.0, 0.0), 0.5));
    }

    #[test]
    fn miss_beside_wall() {
        let mut set = ColliderSet::new();
        wall_at(&mut set, 0.0, 0.0);
        assert!(!set.hit_test(vec3(0.0, 0.0, 2.0), 0.5));
    }

    #[test]
    fn broad_phase_skips_distant_walls() {
        let mut set = ColliderSet::new();
        // A wall so long its box would reach the origin, but whose
        // center sits beyond the broad-phase cutoff: never box-tested.
        set.register(vec3(20.0, 2.5, 0.0), vec3(100.0, 5.0, 1.0));
        assert!(!set.hit_test(vec3(0.0, 0.0, 0.0), 0.5));
    }

    #[test]
    fn query_is_repeatable() {
        let mut set = ColliderSet::new();
        wall_at(&mut set, 1.0, 0.0);
        let p = vec3(0.2, 0.0, 0.0);
        let first = set.hit_test(p, 0.5);
        assert_eq!(first, set.hit_test(p, 0.5));
    }

    #[test]
    fn remove_is_exact_and_idempotent() {
        let mut set = ColliderSet::new();
        let a = wall_at(&mut set, 0.0, 0.0);
        let b = wall_at(&mut set, 5.0, 0.0);
        set.remove(a);
        set.remove(a);
        assert_eq!(set.len(), 1);
        assert!(!set.hit_test(vec3(0.0, 0.0, 0.0), 0.5));
        set.remove(b);
        assert!(set.is_empty());
    }

    #[test]
    fn smaller_radius_squeezes_past() {
        let mut set = ColliderSet::new();
        // Two walls with a 1.1-unit gap between their inner faces
        set.register(vec3(-1.05, 2.5, 0.0), vec3(1.0, 5.0, 4.0));
        set.register(vec3(1.05, 2.5, 0.0), vec3(1.0, 5.0, 4.0));
        // Player-sized volume clips both, stalker-sized fits through
        assert!(set.hit_test(vec3(0.0, 0.0, 0.0), 1.2));
        assert!(!set.hit_test(vec3(0.0, 0.0, 0.0), 0.25));
    }
}
