//! Integer and float geometry primitives.
//!
//! Widget geometry is expressed in whole pixels through [`Vector2i`]. Layout
//! code addresses components by axis index (`0` = x, `1` = y) so that the same
//! algorithm can run along either [`Orientation`].

use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D integer vector used for positions and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

impl Vector2i {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Create a vector with both components set to `value`.
    #[inline]
    pub const fn splat(value: i32) -> Self {
        Self { x: value, y: value }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Whether both components are zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Per-axis override: take `self`'s component where it is nonzero,
    /// otherwise `fallback`'s.
    ///
    /// This is the fixed-size rule used throughout layout: a zero component
    /// means "unconstrained".
    #[inline]
    pub fn or_fallback(self, fallback: Self) -> Self {
        Self::new(
            if self.x != 0 { self.x } else { fallback.x },
            if self.y != 0 { self.y } else { fallback.y },
        )
    }

    /// Convert to a float vector.
    #[inline]
    pub fn to_f32(self) -> Vector2f {
        Vector2f::new(self.x as f32, self.y as f32)
    }
}

impl Index<usize> for Vector2i {
    type Output = i32;

    #[inline]
    fn index(&self, axis: usize) -> &i32 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vector2i axis out of range: {axis}"),
        }
    }
}

impl IndexMut<usize> for Vector2i {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut i32 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Vector2i axis out of range: {axis}"),
        }
    }
}

impl Add for Vector2i {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2i {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2i {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2i {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vector2i {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Div<i32> for Vector2i {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(i32, i32)> for Vector2i {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vector2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2D float vector, used for scroll deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

impl Vector2f {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Vector2f {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// An integer rectangle defined by origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vector2i,
    pub size: Vector2i,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Vector2i::new(x, y),
            size: Vector2i::new(width, height),
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Vector2i, size: Vector2i) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.y
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    /// Half-open containment test: `[origin, origin + size)` on each axis.
    #[inline]
    pub fn contains(&self, point: Vector2i) -> bool {
        let d = point - self.origin;
        d.x >= 0 && d.y >= 0 && d.x < self.size.x && d.y < self.size.y
    }

    /// Grow the rectangle by `amount` on every side.
    #[inline]
    pub fn inflate(&self, amount: i32) -> Self {
        Self::new(
            self.origin.x - amount,
            self.origin.y - amount,
            self.size.x + 2 * amount,
            self.size.y + 2 * amount,
        )
    }

    /// Compute the overlap of two rectangles.
    ///
    /// Disjoint rectangles produce an empty rectangle anchored at the
    /// clamped corner rather than `None`, which is what clip stacks want.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(left, top, (right - left).max(0), (bottom - top).max(0))
    }
}

/// Layout orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Items are arranged left to right.
    #[default]
    Horizontal,
    /// Items are arranged top to bottom.
    Vertical,
}

impl Orientation {
    /// The component index this orientation runs along.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }

    /// Get the cross (perpendicular) orientation.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Placement of an item inside the space a layout gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Align at the start (left/top).
    Minimum,
    /// Center the item.
    #[default]
    Middle,
    /// Align at the end (right/bottom).
    Maximum,
    /// Stretch the item to the available extent.
    Fill,
}

static_assertions::assert_impl_all!(Vector2i: Copy, Send, Sync);
static_assertions::assert_impl_all!(Rect: Copy, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_indexing() {
        let mut v = Vector2i::new(3, 4);
        assert_eq!(v[0], 3);
        assert_eq!(v[Orientation::Vertical.axis()], 4);
        v[1] += 6;
        assert_eq!(v, Vector2i::new(3, 10));
    }

    #[test]
    fn test_or_fallback_keeps_nonzero_components() {
        let fixed = Vector2i::new(0, 25);
        assert_eq!(fixed.or_fallback(Vector2i::new(40, 10)), Vector2i::new(40, 25));
        assert_eq!(Vector2i::ZERO.or_fallback(Vector2i::new(7, 8)), Vector2i::new(7, 8));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(10, 10, 20, 5);
        assert!(r.contains(Vector2i::new(10, 10)));
        assert!(r.contains(Vector2i::new(29, 14)));
        assert!(!r.contains(Vector2i::new(30, 14)));
        assert!(!r.contains(Vector2i::new(10, 15)));
        assert!(!r.contains(Vector2i::new(9, 12)));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 50, 50);
        let b = Rect::new(25, 40, 50, 50);
        assert_eq!(a.intersect(&b), Rect::new(25, 40, 25, 10));

        let far = Rect::new(100, 100, 5, 5);
        assert!(a.intersect(&far).is_empty());
    }

    #[test]
    fn test_orientation_cross() {
        assert_eq!(Orientation::Horizontal.cross(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.cross().axis(), 0);
    }
}
