//! A selection of pixels described as a set of non-overlapping rectangles,
//! and the rasterizer turning rectangles into 8-bit masks.

use crate::geometry::Rect;
use image::{GrayImage, Luma};

/// The area of an image that should be filled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    scans: Vec<Rect>,
    bounds: Rect,
}

impl Selection {
    /// Creates a selection from rectangles that don't overlap each other,
    /// empty rectangles are dropped
    pub fn from_rects<I: IntoIterator<Item = Rect>>(rects: I) -> Self {
        let scans: Vec<Rect> = rects.into_iter().filter(|r| !r.is_empty()).collect();
        let bounds = scans.iter().fold(Rect::default(), |b, r| b.union(r));

        Self { scans, bounds }
    }

    /// Creates a selection from the non-zero pixels of `mask`. Runs of
    /// selected pixels on consecutive rows that share the same columns are
    /// merged into a single rectangle.
    pub fn from_mask(mask: &GrayImage) -> Self {
        let mut closed = Vec::new();
        let mut open: Vec<Rect> = Vec::new();

        for y in 0..mask.height() {
            let mut next = Vec::with_capacity(open.len());

            for (left, right) in row_runs(mask, y) {
                match open.iter().position(|r| r.x == left && r.right() == right) {
                    Some(i) => {
                        let mut rect = open.swap_remove(i);
                        rect.height += 1;
                        next.push(rect);
                    }
                    None => next.push(Rect::from_edges(left, y as i32, right, y as i32 + 1)),
                }
            }

            closed.append(&mut open);
            open = next;
        }
        closed.append(&mut open);

        Self::from_rects(closed)
    }

    pub fn scans(&self) -> &[Rect] {
        &self.scans
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }
}

/// `[left, right)` column ranges of the selected pixels on row `y`
fn row_runs(mask: &GrayImage, y: u32) -> Vec<(i32, i32)> {
    let mut runs = Vec::new();
    let mut start = None;

    for x in 0..mask.width() {
        let selected = mask.get_pixel(x, y)[0] != 0;
        match (selected, start) {
            (true, None) => start = Some(x as i32),
            (false, Some(left)) => {
                runs.push((left, x as i32));
                start = None;
            }
            _ => {}
        }
    }

    if let Some(left) = start {
        runs.push((left, mask.width() as i32));
    }

    runs
}

fn fill_rect(mask: &mut GrayImage, rect: Rect, value: u8) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            mask.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }
}

/// Renders a mask where every `include` rectangle, grown by `inflate`
/// pixels, is set to 255 and every `exclude` rectangle is then cleared
/// back to 0. Everything is clipped to the mask.
pub fn render_mask(
    width: u32,
    height: u32,
    include: &[Rect],
    inflate: i32,
    exclude: &[Rect],
) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let bounds = Rect::new(0, 0, width, height);

    for rect in include {
        fill_rect(&mut mask, rect.inflate(inflate).intersect(&bounds), 255);
    }

    for rect in exclude {
        fill_rect(&mut mask, rect.intersect(&bounds), 0);
    }

    mask
}
