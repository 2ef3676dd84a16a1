//! Dense per-pixel state addressed by `Point`

use crate::geometry::Point;

/// A row-major plain old data grid, one value per pixel
#[derive(Clone)]
pub struct PointIndexedArray<T: Copy> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy> PointIndexedArray<T> {
    pub fn new(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        debug_assert!(self.in_bounds(p), "{:?} outside {}x{}", p, self.width, self.height);
        p.y as usize * self.width as usize + p.x as usize
    }

    #[inline]
    pub fn get(&self, p: Point) -> T {
        self.data[self.index(p)]
    }

    #[inline]
    pub fn set(&mut self, p: Point, value: T) {
        let i = self.index(p);
        self.data[i] = value;
    }

    pub fn fill(&mut self, value: T) {
        for v in self.data.iter_mut() {
            *v = value;
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A packed boolean grid
#[derive(Clone)]
pub struct PointIndexedBitArray {
    width: u32,
    height: u32,
    words: Vec<u64>,
}

impl PointIndexedBitArray {
    pub fn new(width: u32, height: u32) -> Self {
        let bits = width as usize * height as usize;
        Self {
            width,
            height,
            words: vec![0; (bits + 63) / 64],
        }
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    #[inline]
    fn bit(&self, p: Point) -> (usize, u64) {
        debug_assert!(self.in_bounds(p), "{:?} outside {}x{}", p, self.width, self.height);
        let i = p.y as usize * self.width as usize + p.x as usize;
        (i / 64, 1 << (i % 64))
    }

    #[inline]
    pub fn get(&self, p: Point) -> bool {
        let (word, mask) = self.bit(p);
        self.words[word] & mask != 0
    }

    #[inline]
    pub fn set(&mut self, p: Point, value: bool) {
        let (word, mask) = self.bit(p);
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
    }

    pub fn fill(&mut self, value: bool) {
        let word = if value { !0 } else { 0 };
        for w in self.words.iter_mut() {
            *w = word;
        }
    }

    /// Number of set bits inside the grid
    pub fn count_ones(&self) -> usize {
        let bits = self.width as usize * self.height as usize;
        let full = bits / 64;
        let mut count: usize = self.words[..full]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();

        let rem = bits % 64;
        if rem != 0 {
            count += (self.words[full] & ((1u64 << rem) - 1)).count_ones() as usize;
        }
        count
    }
}
