//! Visiting order of the target points.

use crate::{
    comparers::{DirectionalTable, PointOrder},
    context::MatchContext,
    geometry::{centroid, Point},
};
use rand::Rng;

/// Fraction of the point count used as the radius of the randomization band
/// applied after a directional sort
pub const BAND_FRACTION: f64 = 0.02;

/// Reorders `points` according to `context`, consuming `rng` for the random
/// shuffle or the band randomization.
pub fn sort_target_points<R: Rng>(points: &mut [Point], context: MatchContext, rng: &mut R) {
    let center = match centroid(points) {
        Some(c) => c,
        None => return,
    };

    match context {
        MatchContext::None | MatchContext::Random => {
            shuffle(points, rng);
            return;
        }
        MatchContext::InwardHorizontal => sort_around(points, center, |pts| {
            PointOrder::LessHorizontal.sort(pts);
        }),
        MatchContext::OutwardHorizontal => sort_around(points, center, |pts| {
            PointOrder::MoreHorizontal.sort(pts);
        }),
        MatchContext::InwardVertical => sort_around(points, center, |pts| {
            PointOrder::LessVertical.sort(pts);
        }),
        MatchContext::OutwardVertical => sort_around(points, center, |pts| {
            PointOrder::MoreVertical.sort(pts);
        }),
        MatchContext::InwardConcentric => sort_around(points, center, |pts| {
            let table = DirectionalTable::new(pts);
            PointOrder::Inward(&table).sort(pts);
        }),
        MatchContext::OutwardConcentric => sort_around(points, center, |pts| {
            let table = DirectionalTable::new(pts);
            PointOrder::Outward(&table).sort(pts);
        }),
    }

    randomize_bands(points, rng);
}

/// Runs `sort` on the points translated so that `center` is the origin
fn sort_around<F: FnOnce(&mut [Point])>(points: &mut [Point], center: Point, sort: F) {
    for p in points.iter_mut() {
        *p = *p - center;
    }

    sort(points);

    for p in points.iter_mut() {
        *p = *p + center;
    }
}

/// Fisher-Yates
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Swaps each point with a random one at most `half_band` positions away,
/// so the coarse order survives but the scan doesn't leave regular seams
fn randomize_bands<T, R: Rng>(items: &mut [T], rng: &mut R) {
    let count = items.len();
    let half_band = (count as f64 * BAND_FRACTION) as usize;
    if half_band == 0 {
        return;
    }

    for i in 0..count {
        let lo = i.saturating_sub(half_band);
        let hi = (i + half_band).min(count - 1);
        let j = rng.gen_range(lo..=hi);
        items.swap(i, j);
    }
}
