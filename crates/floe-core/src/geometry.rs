//! Geometric primitives for diagram layout.
//!
//! Floe uses a coordinate system consistent with SVG: origin at the
//! top-left corner, X increasing rightward, Y increasing downward.

/// A 2D point in diagram coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// Width and height dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size with the specified dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f32 {
        self.height
    }
}

/// A placement rectangle: a position together with a size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    /// Creates a new rectangle from an origin point and a size
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns the origin (top-left corner) of the rectangle
    pub fn origin(self) -> Point {
        self.origin
    }

    /// Returns the size of the rectangle
    pub fn size(self) -> Size {
        self.size
    }

    /// Returns the center point of the rectangle
    pub fn center(self) -> Point {
        Point::new(
            self.origin.x() + self.size.width() / 2.0,
            self.origin.y() + self.size.height() / 2.0,
        )
    }
}
