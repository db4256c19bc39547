//! Core geometry types: Point, Delta, Size, Rect, Orientation.
//!
//! All coordinates are CSS pixels in viewport space, matching what a host's
//! `getBoundingClientRect` reports. Rects are snapshots taken at query time;
//! nothing in the crate caches them.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Point / Delta
// ---------------------------------------------------------------------------

/// A position in viewport pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The coordinate along `orientation`.
    #[inline]
    pub fn along(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}

/// A displacement between two points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    /// Create a new delta.
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// The component along `orientation`.
    #[inline]
    pub fn along(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.dx,
            Orientation::Vertical => self.dy,
        }
    }

    /// The component across `orientation`.
    #[inline]
    pub fn across(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.dy,
            Orientation::Vertical => self.dx,
        }
    }
}

impl Sub for Point {
    type Output = Delta;
    #[inline]
    fn sub(self, rhs: Point) -> Delta {
        Delta { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

impl Add<Delta> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Delta) -> Point {
        Point { x: self.x + rhs.dx, y: self.y + rhs.dy }
    }
}

impl Neg for Delta {
    type Output = Delta;
    #[inline]
    fn neg(self) -> Delta {
        Delta { dx: -self.dx, dy: -self.dy }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A width/height pair, used for the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An element's bounding box: `{ x, y, width, height }`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// An empty rect at the origin.
    pub const EMPTY: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    /// Create a new rect.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Left edge.
    #[inline]
    pub fn left(self) -> f64 {
        self.x
    }

    /// Top edge.
    #[inline]
    pub fn top(self) -> f64 {
        self.y
    }

    /// Right edge: `x + width`.
    #[inline]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge: `y + height`.
    #[inline]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(self) -> f64 {
        self.x + self.width / 2.0
    }

    /// The top-left corner.
    #[inline]
    pub fn origin(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the point lies inside this rect (right/bottom exclusive).
    #[inline]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Copy of this rect moved by `delta`.
    #[inline]
    pub fn translate(self, delta: Delta) -> Rect {
        Rect { x: self.x + delta.dx, y: self.y + delta.dy, ..self }
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Axis a carousel scrolls along, or a resize handle drags along.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

// ===========================================================================
// Tests
// ===========================================================================
