use crate::Vec3;

/// Axis-Aligned Bounding Box stored as min/max corners.
///
/// Used for triangle bounds and octree cells. The overlap and containment
/// tests carry the exact edge semantics the octree depends on, so their
/// inclusivity is part of the contract, not an implementation detail.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from its corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a degenerate AABB containing a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Widen every face outward by `delta`.
    pub fn expand(&self, delta: f64) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(delta),
            max: self.max + Vec3::splat(delta),
        }
    }

    /// Extend the max corner along each axis until all sides equal the
    /// longest side. The min corner is unchanged.
    pub fn cubed(&self) -> Aabb {
        let size = self.max - self.min;
        let side = size.x.max(size.y).max(size.z);
        Aabb {
            min: self.min,
            max: self.min + Vec3::splat(side),
        }
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-open overlap against `cell`: inclusive at the cell's low faces,
    /// exclusive at its high faces. A box touching a cell's low face
    /// overlaps it; one starting exactly at the high face does not.
    pub fn overlaps(&self, cell: &Aabb) -> bool {
        self.max.cmpge(cell.min).all() && self.min.cmplt(cell.max).all()
    }

    /// Test whether `p` lies inside the box widened by `tolerance` on every
    /// face (inclusive on both sides).
    pub fn contains(&self, p: Vec3, tolerance: f64) -> bool {
        p.cmpge(self.min - Vec3::splat(tolerance)).all()
            && p.cmple(self.max + Vec3::splat(tolerance)).all()
    }
}
