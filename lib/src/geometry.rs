//! Integer 2D points and rectangles

use std::ops::{Add, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared distance from the origin
    #[inline]
    pub fn distance_squared(self) -> i64 {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x * x + y * y
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// An axis aligned rectangle, `right` and `bottom` are exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its edges, collapsing to empty if they are inverted
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Grows the rectangle by `amount` pixels in every direction
    pub fn inflate(&self, amount: i32) -> Self {
        Self::from_edges(
            self.x - amount,
            self.y - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// The smallest rectangle covering both, empty rectangles are ignored
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;

    let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        left = left.min(p.x);
        top = top.min(p.y);
        right = right.max(p.x);
        bottom = bottom.max(p.y);
    }

    Some(Rect::from_edges(left, top, right + 1, bottom + 1))
}

/// Integer mean of the points, truncated toward zero
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let (sum_x, sum_y) = points.iter().fold((0i64, 0i64), |(sx, sy), p| {
        (sx + i64::from(p.x), sy + i64::from(p.y))
    });
    let count = points.len() as i64;

    Some(Point::new((sum_x / count) as i32, (sum_y / count) as i32))
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect_points(rect: Rect) -> Vec<Point> {
        let mut points = Vec::new();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                points.push(Point::new(x, y));
            }
        }
        points
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3, -2);
        let b = Point::new(-1, 5);

        assert_eq!(a + b, Point::new(2, 3));
        assert_eq!(a - b, Point::new(4, -7));
        assert_eq!(-a, Point::new(-3, 2));
        assert_eq!(a.distance_squared(), 13);
    }

    #[test]
    fn rect_ops() {
        let r = Rect::new(2, 3, 4, 5);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 8);
        assert!(r.contains(Point::new(2, 3)));
        assert!(!r.contains(Point::new(6, 3)));

        assert_eq!(r.inflate(2), Rect::new(0, 1, 8, 9));
        assert_eq!(
            r.intersect(&Rect::new(4, 0, 10, 4)),
            Rect::new(4, 3, 2, 1)
        );
        assert!(r.intersect(&Rect::new(10, 10, 2, 2)).is_empty());
        assert_eq!(r.union(&Rect::new(0, 0, 1, 1)), Rect::new(0, 0, 6, 8));
        assert_eq!(Rect::default().union(&r), r);
    }

    #[test]
    fn bounds_of_points() {
        assert_eq!(bounding_box(&[]), None);

        let points = [Point::new(4, 1), Point::new(-2, 7), Point::new(0, 0)];
        assert_eq!(bounding_box(&points), Some(Rect::new(-2, 0, 7, 8)));
    }

    #[test]
    fn centroid_of_rectangle_is_its_center() {
        let rect = Rect::new(10, 20, 9, 5);
        let points = rect_points(rect);

        assert_eq!(centroid(&points), Some(Point::new(14, 22)));
        assert_eq!(centroid(&[]), None);
    }
}
