//! Octree spatial index over the scene's triangles.
//!
//! Built absolutely (not incrementally) from triangle bounds, with the eye
//! position folded into a cubical root. Traversal is stateful: starting
//! from the subcell containing the ray's entry point, it steps across
//! subcell exit faces in ray order, so the first hit found inside a
//! subcell is the overall nearest and the walk can stop there.

use minilight_math::{Aabb, Ray, Vec3};

use crate::triangle::{Triangle, TriangleId, TOLERANCE};

/// Deepest allowed node path. Forcing a subcell's level here makes it a
/// leaf regardless of item count.
const MAX_LEVELS: usize = 44;

/// Leaf capacity before a node subdivides.
const MAX_ITEMS: usize = 8;

/// Octree node - either a branch with eight child slots or a leaf with
/// triangle ids.
///
/// Subcell indexing: bit 0 = x-high, bit 1 = y-high, bit 2 = z-high.
enum Node {
    Branch {
        bound: Aabb,
        children: [Option<Box<Node>>; 8],
    },
    Leaf {
        bound: Aabb,
        items: Vec<TriangleId>,
    },
}

/// Octree over triangle ids, accelerating nearest-hit queries.
pub struct SpatialIndex {
    root: Node,
}

impl SpatialIndex {
    /// Build the index over `triangles`. `eye` is folded into the root
    /// bound so camera rays always start inside the tree.
    pub fn new(eye: Vec3, triangles: &[Triangle]) -> Self {
        let item_bounds: Vec<Aabb> = triangles.iter().map(|t| t.bound()).collect();

        let mut bound = Aabb::from_point(eye);
        for item in &item_bounds {
            bound = Aabb::surrounding(&bound, item);
        }
        let bound = bound.cubed();

        let items: Vec<TriangleId> = (0..triangles.len()).collect();
        Self {
            root: Node::subdivide(bound, items, &item_bounds, 0),
        }
    }

    /// Nearest intersection along `ray`, skipping `last_hit`.
    pub fn intersect(
        &self,
        ray: &Ray,
        triangles: &[Triangle],
        last_hit: Option<TriangleId>,
    ) -> Option<(TriangleId, Vec3)> {
        self.root.intersect(ray, triangles, last_hit, ray.origin)
    }
}

/// Bound of subcell `sub_cell` inside `bound` with the given center.
fn subcell_bound(bound: &Aabb, center: Vec3, sub_cell: usize) -> Aabb {
    let mut min = bound.min;
    let mut max = center;
    for axis in 0..3 {
        if (sub_cell >> axis) & 1 == 1 {
            min[axis] = center[axis];
            max[axis] = bound.max[axis];
        }
    }
    Aabb::new(min, max)
}

impl Node {
    /// Recursive subdivision.
    ///
    /// A node overflowing MAX_ITEMS becomes a branch unless the tree is
    /// already at depth. Scenes spanning many decades of scale can put a
    /// parent's entire item set into one subcell legitimately, but into
    /// two only when the items will never separate, so the second
    /// whole-set subcell (and any subcell thinner than 4x the triangle
    /// tolerance) is forced to the terminal level and becomes a leaf.
    fn subdivide(bound: Aabb, items: Vec<TriangleId>, item_bounds: &[Aabb], level: usize) -> Node {
        if items.len() <= MAX_ITEMS || level >= MAX_LEVELS - 1 {
            return Node::Leaf { bound, items };
        }

        let center = bound.center();
        let mut children: [Option<Box<Node>>; 8] = Default::default();
        let mut whole_set_subcells = 0;

        for sub_cell in 0..8 {
            let sub_bound = subcell_bound(&bound, center, sub_cell);

            let sub_items: Vec<TriangleId> = items
                .iter()
                .copied()
                .filter(|&id| item_bounds[id].overlaps(&sub_bound))
                .collect();

            if sub_items.len() == items.len() {
                whole_set_subcells += 1;
            }
            if sub_items.is_empty() {
                continue;
            }

            let curtail = whole_set_subcells > 1
                || (sub_bound.max.x - sub_bound.min.x) < TOLERANCE * 4.0;
            let next_level = if curtail { MAX_LEVELS } else { level + 1 };

            children[sub_cell] = Some(Box::new(Node::subdivide(
                sub_bound,
                sub_items,
                item_bounds,
                next_level,
            )));
        }

        Node::Branch { bound, children }
    }

    /// Nearest hit at or after `start`, which must lie on the ray inside
    /// this node's bound.
    fn intersect(
        &self,
        ray: &Ray,
        triangles: &[Triangle],
        last_hit: Option<TriangleId>,
        start: Vec3,
    ) -> Option<(TriangleId, Vec3)> {
        match self {
            Node::Branch { bound, children } => {
                let center = bound.center();

                // subcell containing the entry point
                let mut sub_cell = 0usize;
                for axis in 0..3 {
                    if start[axis] >= center[axis] {
                        sub_cell |= 1 << axis;
                    }
                }

                let mut cell_position = start;
                loop {
                    if let Some(child) = children[sub_cell].as_deref() {
                        // subcells are visited in ray order, so the first
                        // hit is the nearest
                        if let Some(hit) =
                            child.intersect(ray, triangles, last_hit, cell_position)
                        {
                            return Some(hit);
                        }
                    }

                    // exit face the ray crosses soonest
                    let mut step = f64::INFINITY;
                    let mut axis = 0;
                    for i in 0..3 {
                        let high = (sub_cell >> i) & 1 == 1;
                        let face = if (ray.direction[i] < 0.0) != high {
                            // moving away from the center plane: outer wall
                            if high {
                                bound.max[i]
                            } else {
                                bound.min[i]
                            }
                        } else {
                            center[i]
                        };
                        let distance = (face - ray.origin[i]) / ray.direction[i];
                        if distance <= step {
                            step = distance;
                            axis = i;
                        }
                    }

                    // leaving the branch: low subcell moving down, or high
                    // subcell moving up
                    let high = (sub_cell >> axis) & 1 == 1;
                    if high == (ray.direction[axis] >= 0.0) {
                        return None;
                    }

                    cell_position = ray.at(step);
                    sub_cell ^= 1 << axis;
                }
            }

            Node::Leaf { bound, items } => {
                let mut nearest_distance = f64::INFINITY;
                let mut nearest = None;

                for &id in items {
                    if last_hit == Some(id) {
                        continue;
                    }
                    if let Some(distance) = triangles[id].intersect(ray) {
                        if distance < nearest_distance {
                            let hit = ray.at(distance);
                            // only accept hits inside this cell, so a
                            // triangle straddling cells is reported once,
                            // by the first cell in ray order
                            if bound.contains(hit, TOLERANCE) {
                                nearest_distance = distance;
                                nearest = Some((id, hit));
                            }
                        }
                    }
                }
                nearest
            }
        }
    }
}
