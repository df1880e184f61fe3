//! Math utilities and types
//!
//! Provides the vector and bounding-box types used by every collision query.
//! The simulation is Y-up; the broad phase works on the XZ ground plane.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Returns true when every component of the vector is finite
#[inline]
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Box occupied by an agent capsule whose center is `position`
    ///
    /// Feet sit at `position.y - height / 2`, the head at `position.y + height / 2`.
    pub fn from_capsule(position: Vec3, radius: f32, height: f32) -> Self {
        Self::from_center_extents(position, Vec3::new(radius, height * 0.5, radius))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// An empty box has a non-finite corner or a max below its min on some axis
    pub fn is_empty(&self) -> bool {
        !is_finite_vec(&self.min)
            || !is_finite_vec(&self.max)
            || self.max.x < self.min.x
            || self.max.y < self.min.y
            || self.max.z < self.min.z
    }

    /// Check if this AABB intersects another AABB (touching faces count)
    pub fn intersects(&self, other: &AABB) -> bool {
        self.overlaps_xz(other) &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Strict intersection: boxes sharing only a face do not overlap
    pub fn overlaps_strict(&self, other: &AABB) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x &&
        self.min.y < other.max.y && self.max.y > other.min.y &&
        self.min.z < other.max.z && self.max.z > other.min.z
    }

    /// Overlap on the ground plane only, ignoring height
    pub fn overlaps_xz(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Grow the box by `amount` on every side of the XZ plane
    pub fn expanded_xz(&self, amount: f32) -> AABB {
        let pad = Vec3::new(amount, 0.0, amount);
        AABB::new(self.min - pad, self.max + pad)
    }

    /// Test ray intersection with this AABB using slab method
    ///
    /// Returns the distance to the entry point if the ray intersects, `None`
    /// otherwise. A ray that starts inside the box hits at distance 0.
    /// Axes the ray runs parallel to are handled explicitly so a ray lying
    /// exactly on a slab plane never produces `0 * inf`.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray_origin[axis];
            let dir = ray_dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        // Ray intersects if tmax >= tmin and tmax >= 0
        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}
