//! R-tree index of switch points.
//!
//! Used when building the network to decide whether a new track end lands on
//! an existing junction (within a snap tolerance) or needs a fresh switch.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rail_core::{Point, SwitchId};

/// Entry stored in the R-tree: a `[x, y]` point with the associated switch.
#[derive(Clone, Debug)]
struct SwitchEntry {
    point: [f64; 2],
    id:    SwitchId,
}

impl RTreeObject for SwitchEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SwitchEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-switch lookups over switch points.
#[derive(Clone, Debug, Default)]
pub struct SwitchIndex {
    tree: RTree<SwitchEntry>,
}

impl SwitchIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, point: Point, id: SwitchId) {
        self.tree.insert(SwitchEntry { point: [point.x, point.y], id });
    }

    /// The switch nearest to `point`, or `None` if the index is empty.
    pub fn nearest(&self, point: Point) -> Option<SwitchId> {
        self.tree.nearest_neighbor(&[point.x, point.y]).map(|e| e.id)
    }

    /// The nearest switch no further than `tolerance` from `point`.
    pub fn within(&self, point: Point, tolerance: f64) -> Option<SwitchId> {
        let query = [point.x, point.y];
        self.tree
            .nearest_neighbor(&query)
            .filter(|e| e.distance_2(&query) <= tolerance * tolerance)
            .map(|e| e.id)
    }
}
