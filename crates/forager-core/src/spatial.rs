use rstar::{RTree, RTreeObject, AABB};
use std::collections::HashSet;

/// Rectangular wrap-around world extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Torus {
    pub width: f64,
    pub height: f64,
}

impl Torus {
    pub fn new(width: f64, height: f64) -> Self {
        debug_assert!(width.is_finite() && width > 0.0, "torus width must be positive");
        debug_assert!(height.is_finite() && height > 0.0, "torus height must be positive");
        Self { width, height }
    }

    /// Bring a position back into `[0, width) x [0, height)`.
    pub fn wrap(&self, position: [f64; 2]) -> [f64; 2] {
        [
            wrap_coord(position[0], self.width),
            wrap_coord(position[1], self.height),
        ]
    }

    /// Shortest displacement from `from` to `to` across the wrap.
    pub fn delta(&self, from: [f64; 2], to: [f64; 2]) -> [f64; 2] {
        [
            wrapped_delta(to[0] - from[0], self.width),
            wrapped_delta(to[1] - from[1], self.height),
        ]
    }

    pub fn distance(&self, from: [f64; 2], to: [f64; 2]) -> f64 {
        let [dx, dy] = self.delta(from, to);
        dx.hypot(dy)
    }
}

/// Index entry tagging what sits at a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    Prey(usize),
    Forager(usize),
}

#[derive(Clone, Debug)]
pub struct EntityLocation {
    pub entity: EntityRef,
    pub position: [f64; 2],
}

impl RTreeObject for EntityLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// Build an R*-tree from entity positions via bulk_load.
pub fn build_index(locations: Vec<EntityLocation>) -> RTree<EntityLocation> {
    RTree::bulk_load(locations)
}

/// Entities within `radius` of `center` on the torus, excluding `exclude`.
/// Results are sorted so callers iterate deterministically.
pub fn query_neighbors(
    tree: &RTree<EntityLocation>,
    center: [f64; 2],
    radius: f64,
    exclude: Option<EntityRef>,
    torus: Torus,
) -> Vec<EntityRef> {
    let mut result = Vec::new();
    for_each_unique_neighbor(tree, center, radius, exclude, torus, |entity| {
        result.push(entity);
    });
    result.sort_unstable();
    result
}

fn for_each_unique_neighbor(
    tree: &RTree<EntityLocation>,
    center: [f64; 2],
    radius: f64,
    exclude: Option<EntityRef>,
    torus: Torus,
    mut visitor: impl FnMut(EntityRef),
) {
    let (x_offsets, x_len) = wrap_offsets(center[0], radius, torus.width);
    let (y_offsets, y_len) = wrap_offsets(center[1], radius, torus.height);
    let r_sq = radius * radius;

    // Windows shifted by a full period cannot overlap when the radius is below half of it.
    let disjoint = radius * 2.0 < torus.width.min(torus.height);
    let mut seen = HashSet::new();

    for &xoff in &x_offsets[..x_len] {
        for &yoff in &y_offsets[..y_len] {
            let translated = [center[0] + xoff, center[1] + yoff];
            let envelope = AABB::from_corners(
                [translated[0] - radius, translated[1] - radius],
                [translated[0] + radius, translated[1] + radius],
            );
            for loc in tree.locate_in_envelope(&envelope) {
                if Some(loc.entity) == exclude {
                    continue;
                }
                let [dx, dy] = torus.delta(center, loc.position);
                if dx * dx + dy * dy > r_sq {
                    continue;
                }
                if disjoint || seen.insert(loc.entity) {
                    visitor(loc.entity);
                }
            }
        }
    }
}

fn wrap_offsets(coord: f64, radius: f64, extent: f64) -> ([f64; 3], usize) {
    let mut offsets = [0.0; 3];
    let mut len = 1usize;
    if coord < radius {
        offsets[len] = extent;
        len += 1;
    }
    if coord + radius >= extent {
        offsets[len] = -extent;
        len += 1;
    }
    (offsets, len)
}

fn wrap_coord(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

fn wrapped_delta(delta: f64, extent: f64) -> f64 {
    (delta + extent / 2.0).rem_euclid(extent) - extent / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(entity: EntityRef, x: f64, y: f64) -> EntityLocation {
        EntityLocation {
            entity,
            position: [x, y],
        }
    }

    #[test]
    fn finds_neighbors_within_radius() {
        let tree = build_index(vec![
            loc(EntityRef::Forager(0), 50.0, 50.0),
            loc(EntityRef::Prey(0), 53.0, 50.0),
            loc(EntityRef::Prey(1), 70.0, 50.0),
        ]);
        let found = query_neighbors(
            &tree,
            [50.0, 50.0],
            5.0,
            Some(EntityRef::Forager(0)),
            Torus::new(100.0, 100.0),
        );
        assert_eq!(found, vec![EntityRef::Prey(0)]);
    }

    #[test]
    fn finds_neighbors_across_both_wrap_edges() {
        let torus = Torus::new(100.0, 60.0);
        let tree = build_index(vec![
            loc(EntityRef::Prey(0), 99.0, 59.0),
            loc(EntityRef::Prey(1), 1.0, 1.0),
            loc(EntityRef::Prey(2), 50.0, 30.0),
        ]);
        let found = query_neighbors(&tree, [0.5, 0.5], 3.0, None, torus);
        assert_eq!(found, vec![EntityRef::Prey(0), EntityRef::Prey(1)]);
    }

    #[test]
    fn large_radius_reports_each_entity_once() {
        let torus = Torus::new(10.0, 10.0);
        let tree = build_index(vec![
            loc(EntityRef::Prey(0), 1.0, 1.0),
            loc(EntityRef::Prey(1), 9.0, 9.0),
        ]);
        let found = query_neighbors(&tree, [5.0, 5.0], 8.0, None, torus);
        assert_eq!(found, vec![EntityRef::Prey(0), EntityRef::Prey(1)]);
    }

    #[test]
    fn torus_wraps_and_measures_shortest_path() {
        let torus = Torus::new(100.0, 50.0);
        assert_eq!(torus.wrap([-1.0, 51.0]), [99.0, 1.0]);
        assert_eq!(torus.wrap([100.0, 0.0]), [0.0, 0.0]);
        let d = torus.delta([99.0, 49.0], [1.0, 1.0]);
        assert!((d[0] - 2.0).abs() < 1e-12);
        assert!((d[1] - 2.0).abs() < 1e-12);
        assert!((torus.distance([0.0, 0.0], [97.0, 0.0]) - 3.0).abs() < 1e-12);
    }
}
