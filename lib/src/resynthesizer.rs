use image::{GrayImage, Rgba, RgbaImage};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{
    context::MatchContext,
    errors::{Error, SizeMismatch},
    geometry::Point,
    point_array::{PointIndexedArray, PointIndexedBitArray},
    progress::{CancelToken, ProgressStat},
    sorter::sort_target_points,
};

/// How many already synthesized pixels around a target pixel are matched
pub const MAX_NEIGHBORS: usize = 16;
/// How many random source points are tried per target pixel
pub const RANDOM_TRIALS: usize = 500;
/// Shape of the color difference curve, lower values penalize small
/// differences more
pub const SENSITIVITY_TO_OUTLIERS: f64 = 0.117;
/// Penalty for a maximal difference in one channel
pub const MAX_WEIGHT: i32 = 65536;
pub const MAX_PASSES: usize = 6;
/// A pass that improves less than this fraction of its pixels ends the run
pub const TERMINATE_FRACTION: f32 = 0.1;
/// Number of processed pixels between progress reports
pub const PROGRESS_INTERVAL: usize = 4096;

const DIFF_TABLE_LEN: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Constructed,
    /// Target and source points have been collected and validated
    PreparedPoints,
    /// Offsets, difference table and pass schedule are ready
    PreparedAuxiliary,
    Synthesizing,
    Completed,
    Canceled,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillOutcome {
    Completed {
        /// The number of passes that were run before converging
        passes: usize,
        /// Total number of pixels that received a better source over all passes
        betterments: usize,
    },
    Canceled,
}

#[derive(Clone, Copy, Debug)]
struct Neighbor {
    offset: Point,
    color: Rgba<u8>,
    source_of: Option<Point>,
}

#[inline]
fn is_selected(mask_value: u8) -> bool {
    mask_value != 0
}

#[inline]
fn neg_log_cauchy(d: f64) -> f64 {
    (d * d + 1.0).ln()
}

/// Maps a signed channel difference, offset by 256, to a penalty that
/// saturates at `MAX_WEIGHT`, so a few wildly different pixels don't
/// outweigh many slightly different ones
pub fn make_diff_table(sensitivity: f64) -> [i32; DIFF_TABLE_LEN] {
    let mut table = [0; DIFF_TABLE_LEN];
    let scale = neg_log_cauchy(1.0 / sensitivity);

    for (i, value) in table.iter_mut().enumerate() {
        let delta = i as f64 - 256.0;
        *value = (neg_log_cauchy(delta / 256.0 / sensitivity) / scale * f64::from(MAX_WEIGHT))
            .round() as i32;
    }

    table
}

/// The number of target points visited by each pass, every pass only
/// revisits the first three quarters of the previous one
pub fn repetition_schedule(target_count: usize) -> Vec<usize> {
    let mut schedule = Vec::with_capacity(MAX_PASSES);
    let mut count = target_count;
    for _ in 0..MAX_PASSES {
        schedule.push(count);
        count = count * 3 / 4;
    }
    schedule
}

/// Every offset that fits in a `width` x `height` area, closest first
fn sorted_offsets(width: u32, height: u32) -> Vec<Point> {
    let (w, h) = (width as i32, height as i32);
    let mut offsets = Vec::with_capacity(((2 * w - 1).max(0) * (2 * h - 1).max(0)) as usize);

    for y in -h + 1..h {
        for x in -w + 1..w {
            offsets.push(Point::new(x, y));
        }
    }

    offsets.sort_by_key(|p| p.distance_squared());
    offsets
}

/// Fills the selected pixels of a target image with pixels copied from the
/// selected pixels of a source image.
///
/// Target pixels are visited in an order given by the match context. Each
/// one is compared, through its closest already synthesized neighbors, with
/// candidate source locations: first the ones implied by the sources of its
/// neighbors, then random ones. The best candidate is copied over. Later
/// passes revisit a shrinking prefix of the target points to refine them.
pub struct Resynthesizer {
    target: RgbaImage,
    target_mask: GrayImage,
    source: RgbaImage,
    source_mask: GrayImage,
    context: MatchContext,
    rng: Pcg32,
    state: EngineState,

    target_points: Vec<Point>,
    source_points: Vec<Point>,
    sorted_offsets: Vec<Point>,
    diff_table: [i32; DIFF_TABLE_LEN],
    schedule: Vec<usize>,

    has_value: PointIndexedBitArray,
    source_of: PointIndexedArray<Option<Point>>,
    // the visit in which a source point was last tried
    tried: PointIndexedArray<usize>,
    visit: usize,
    neighbors: Vec<Neighbor>,
}

impl Resynthesizer {
    pub fn new(
        target: RgbaImage,
        target_mask: GrayImage,
        source: RgbaImage,
        source_mask: GrayImage,
        context: MatchContext,
        seed: u64,
    ) -> Result<Self, Error> {
        for (image, mask) in [
            (target.dimensions(), target_mask.dimensions()),
            (source.dimensions(), source_mask.dimensions()),
        ]
        .iter()
        {
            if image != mask {
                return Err(Error::SizeMismatch(SizeMismatch {
                    image: *image,
                    mask: *mask,
                }));
            }
        }

        let (tw, th) = target.dimensions();
        let (sw, sh) = source.dimensions();

        Ok(Self {
            target,
            target_mask,
            source,
            source_mask,
            context,
            rng: Pcg32::seed_from_u64(seed),
            state: EngineState::Constructed,
            target_points: Vec::new(),
            source_points: Vec::new(),
            sorted_offsets: Vec::new(),
            diff_table: [0; DIFF_TABLE_LEN],
            schedule: Vec::new(),
            has_value: PointIndexedBitArray::new(tw, th),
            source_of: PointIndexedArray::new(tw, th, None),
            tried: PointIndexedArray::new(sw, sh, usize::MAX),
            visit: 0,
            neighbors: Vec::with_capacity(MAX_NEIGHBORS),
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn target(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_target(self) -> RgbaImage {
        self.target
    }

    /// The source location the pixel at `p` was copied from, if any
    pub fn source_of(&self, p: Point) -> Option<Point> {
        if self.source_of.in_bounds(p) {
            self.source_of.get(p)
        } else {
            None
        }
    }

    /// Every filled target pixel with the source pixel it was copied from
    pub fn assignments(&self) -> Vec<(Point, Point)> {
        self.target_points
            .iter()
            .filter_map(|p| self.source_of.get(*p).map(|s| (*p, s)))
            .collect()
    }

    /// Runs the synthesis. Pixels already written when `cancel` is triggered
    /// keep their new values.
    pub fn content_aware_fill(
        &mut self,
        progress: &mut dyn FnMut(ProgressStat),
        cancel: &CancelToken,
    ) -> Result<FillOutcome, Error> {
        if let Err(e) = self.prepare_points() {
            self.state = EngineState::Failed;
            return Err(e);
        }
        self.state = EngineState::PreparedPoints;

        self.prepare_auxiliary();
        self.state = EngineState::PreparedAuxiliary;

        let schedule = self.schedule.clone();
        let total: usize = schedule.iter().sum();
        let mut processed = 0;
        let mut total_betterments = 0;
        let mut passes = 0;

        self.state = EngineState::Synthesizing;

        for (pass, &count) in schedule.iter().enumerate() {
            if count == 0 {
                break;
            }

            let betterments = match self.synthesize(count, &mut processed, total, progress, cancel) {
                Some(b) => b,
                None => {
                    warn!("fill canceled during pass {}", pass);
                    self.state = EngineState::Canceled;
                    return Ok(FillOutcome::Canceled);
                }
            };

            passes += 1;
            total_betterments += betterments;
            progress(ProgressStat {
                current: processed,
                total,
            });

            let fraction = betterments as f32 / count as f32;
            info!(
                "pass {} improved {} of {} pixels ({:.3})",
                pass, betterments, count, fraction
            );

            if fraction < TERMINATE_FRACTION {
                debug!("converged after {} passes", passes);
                break;
            }
        }

        progress(ProgressStat {
            current: total,
            total,
        });
        self.state = EngineState::Completed;

        Ok(FillOutcome::Completed {
            passes,
            betterments: total_betterments,
        })
    }

    fn prepare_points(&mut self) -> Result<(), Error> {
        let use_context = self.context.uses_context();

        self.target_points.clear();
        self.has_value.fill(false);
        self.source_of.fill(None);

        for (x, y, mask) in self.target_mask.enumerate_pixels() {
            let p = Point::new(x as i32, y as i32);
            let selected = is_selected(mask[0]);

            if selected {
                self.target_points.push(p);
            } else if use_context && self.target.get_pixel(x, y)[3] != 0 {
                self.has_value.set(p, true);
            }
        }

        if self.target_points.is_empty() {
            return Err(Error::NoTargetPoints);
        }

        self.source_points.clear();
        for (x, y, mask) in self.source_mask.enumerate_pixels() {
            if is_selected(mask[0]) && self.source.get_pixel(x, y)[3] != 0 {
                self.source_points.push(Point::new(x as i32, y as i32));
            }
        }

        if self.source_points.is_empty() {
            return Err(Error::NoSourcePoints);
        }

        sort_target_points(&mut self.target_points, self.context, &mut self.rng);

        debug!(
            "{} target points, {} source points, context {:?}",
            self.target_points.len(),
            self.source_points.len(),
            self.context
        );

        Ok(())
    }

    fn prepare_auxiliary(&mut self) {
        let width = self.target.width().min(self.source.width());
        let height = self.target.height().min(self.source.height());

        self.sorted_offsets = sorted_offsets(width, height);
        self.diff_table = make_diff_table(SENSITIVITY_TO_OUTLIERS);
        self.schedule = repetition_schedule(self.target_points.len());

        debug!(
            "{} offsets, pass schedule {:?}",
            self.sorted_offsets.len(),
            self.schedule
        );
    }

    /// Runs one pass over the first `count` target points. Returns the
    /// number of pixels that got a new source, or `None` if canceled.
    fn synthesize(
        &mut self,
        count: usize,
        processed: &mut usize,
        total: usize,
        progress: &mut dyn FnMut(ProgressStat),
        cancel: &CancelToken,
    ) -> Option<usize> {
        let mut betterments = 0;

        for i in 0..count {
            if cancel.is_canceled() {
                return None;
            }

            let position = self.target_points[i];
            self.has_value.set(position, true);
            self.gather_neighbors(position);

            if let Some(best) = self.find_best_source() {
                if self.source_of.get(position) != Some(best) {
                    let color = *self.source.get_pixel(best.x as u32, best.y as u32);
                    self.target
                        .put_pixel(position.x as u32, position.y as u32, color);
                    self.source_of.set(position, Some(best));
                    betterments += 1;
                }
            }

            *processed += 1;
            if *processed % PROGRESS_INTERVAL == 0 {
                progress(ProgressStat {
                    current: *processed,
                    total,
                });
            }
        }

        Some(betterments)
    }

    fn gather_neighbors(&mut self, position: Point) {
        self.neighbors.clear();

        for &offset in &self.sorted_offsets {
            let p = position + offset;
            if self.has_value.in_bounds(p) && self.has_value.get(p) {
                self.neighbors.push(Neighbor {
                    offset,
                    color: *self.target.get_pixel(p.x as u32, p.y as u32),
                    source_of: self.source_of.get(p),
                });

                if self.neighbors.len() == MAX_NEIGHBORS {
                    break;
                }
            }
        }
    }

    fn find_best_source(&mut self) -> Option<Point> {
        let mut best_score = i32::MAX;
        let mut best = None;

        self.visit += 1;

        // Extend the patches the neighbors were copied from
        for n in 0..self.neighbors.len() {
            let neighbor = self.neighbors[n];
            let candidate = match neighbor.source_of {
                Some(source) => source - neighbor.offset,
                None => continue,
            };

            if !self.is_usable_source(candidate) || self.tried.get(candidate) == self.visit {
                continue;
            }
            self.tried.set(candidate, self.visit);

            if let Some(score) = self.score(candidate, best_score) {
                best_score = score;
                best = Some(candidate);
                if score == 0 {
                    return best;
                }
            }
        }

        for _ in 0..RANDOM_TRIALS {
            let candidate = self.source_points[self.rng.gen_range(0..self.source_points.len())];

            if let Some(score) = self.score(candidate, best_score) {
                best_score = score;
                best = Some(candidate);
                if score == 0 {
                    break;
                }
            }
        }

        best
    }

    #[inline]
    fn is_usable_source(&self, p: Point) -> bool {
        self.in_source(p)
            && is_selected(self.source_mask.get_pixel(p.x as u32, p.y as u32)[0])
            && self.source.get_pixel(p.x as u32, p.y as u32)[3] != 0
    }

    #[inline]
    fn in_source(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.source.width() && (p.y as u32) < self.source.height()
    }

    /// Sums the differences between the neighbors and the pixels at the same
    /// offsets around `candidate`. Returns `None` as soon as the sum reaches
    /// `current_best`.
    ///
    /// The first neighbor is the pixel itself, it only counts when it falls
    /// outside the usable source area.
    #[inline]
    fn score(&self, candidate: Point, current_best: i32) -> Option<i32> {
        let mut sum = 0;

        for (i, neighbor) in self.neighbors.iter().enumerate() {
            let p = candidate + neighbor.offset;

            if !self.in_source(p)
                || !is_selected(self.source_mask.get_pixel(p.x as u32, p.y as u32)[0])
            {
                sum += MAX_WEIGHT * 3;
            } else if i > 0 {
                let color = self.source.get_pixel(p.x as u32, p.y as u32);
                for channel in 0..3 {
                    let delta = i32::from(neighbor.color[channel]) - i32::from(color[channel]);
                    sum += self.diff_table[(256 + delta) as usize];
                }
            }

            if sum >= current_best {
                return None;
            }
        }

        Some(sum)
    }
}
