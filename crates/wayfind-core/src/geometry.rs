//! Polygon primitives used by the rasterizer.

use crate::Vec2;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Strict intersection: boxes that only share an edge or a corner do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Ray-casting containment test.
///
/// Polygons with fewer than 3 vertices contain nothing. Points exactly on an edge may be
/// classified either way; the rasterizer samples corners as well as centers to cover seams.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn bounding_box(polygon: &[Vec2]) -> Option<Aabb> {
    let first = *polygon.first()?;
    let mut min = first;
    let mut max = first;
    for p in polygon.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Aabb { min, max })
}

/// Coarse overlap test: `true` iff the bounding boxes strictly intersect.
///
/// This is not a polygon intersection test. It only validates "bridge" cells whose corners
/// touch several corridors, and can over-connect L-shaped or diagonal layouts.
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    match (bounding_box(a), bounding_box(b)) {
        (Some(a), Some(b)) => a.intersects(&b),
        _ => false,
    }
}
