//! Orderings over points that are already expressed relative to a center.

use crate::geometry::Point;
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Number of discrete angular rays, covering `-PI..=PI`
pub const RAY_COUNT: usize = 401;

#[inline]
fn ray_index(p: Point) -> usize {
    let angle = f64::from(p.y).atan2(f64::from(p.x));
    ((angle * 200.0 / PI).round() as i32 + 200) as usize
}

/// The largest squared distance seen along each ray of a point set.
///
/// Dividing a point's squared distance by the maximum on its own ray gives
/// how far out it lies relative to the extent of the region in that
/// direction, which follows the outline of elongated or non-convex regions
/// instead of a circle around the center.
///
/// The 401 rays are coarse. Along a long straight edge neighboring boundary
/// points can share a ray, and only the farthest of them reaches 1.0.
#[derive(Clone)]
pub struct DirectionalTable {
    max_distance: Vec<i64>,
}

impl DirectionalTable {
    pub fn new(points: &[Point]) -> Self {
        let mut max_distance = vec![0i64; RAY_COUNT];

        for p in points {
            let ray = &mut max_distance[ray_index(*p)];
            *ray = (*ray).max(p.distance_squared());
        }

        Self { max_distance }
    }

    /// In `0.0..=1.0` for points of the set the table was built from
    #[inline]
    pub fn proportion(&self, p: Point) -> f64 {
        let max = self.max_distance[ray_index(p)];
        if max == 0 {
            0.0
        } else {
            p.distance_squared() as f64 / max as f64
        }
    }
}

/// Ordering strategies for target points. `Less*` and `Inward` visit the
/// points closest to the center first, `More*` and `Outward` the farthest.
#[derive(Clone, Copy)]
pub enum PointOrder<'a> {
    LessCartesian,
    MoreCartesian,
    /// By `|x|`
    LessHorizontal,
    MoreHorizontal,
    /// By `|y|`
    LessVertical,
    MoreVertical,
    Inward(&'a DirectionalTable),
    Outward(&'a DirectionalTable),
}

impl<'a> PointOrder<'a> {
    pub fn compare(&self, a: Point, b: Point) -> Ordering {
        match self {
            Self::LessCartesian => a.distance_squared().cmp(&b.distance_squared()),
            Self::MoreCartesian => b.distance_squared().cmp(&a.distance_squared()),
            Self::LessHorizontal => a.x.abs().cmp(&b.x.abs()),
            Self::MoreHorizontal => b.x.abs().cmp(&a.x.abs()),
            Self::LessVertical => a.y.abs().cmp(&b.y.abs()),
            Self::MoreVertical => b.y.abs().cmp(&a.y.abs()),
            Self::Inward(table) => cmp_f64(table.proportion(a), table.proportion(b)),
            Self::Outward(table) => cmp_f64(table.proportion(b), table.proportion(a)),
        }
    }

    /// Stable sort, points that compare equal keep their relative order
    pub fn sort(&self, points: &mut [Point]) {
        match self {
            // Precompute the proportions instead of doing 2 atan2 per comparison
            Self::Inward(table) => sort_by_proportion(points, table, false),
            Self::Outward(table) => sort_by_proportion(points, table, true),
            order => points.sort_by(|a, b| order.compare(*a, *b)),
        }
    }
}

#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn sort_by_proportion(points: &mut [Point], table: &DirectionalTable, descending: bool) {
    let mut keyed: Vec<(f64, Point)> = points.iter().map(|p| (table.proportion(*p), *p)).collect();

    if descending {
        keyed.sort_by(|a, b| cmp_f64(b.0, a.0));
    } else {
        keyed.sort_by(|a, b| cmp_f64(a.0, b.0));
    }

    for (out, (_, p)) in points.iter_mut().zip(keyed) {
        *out = p;
    }
}
