//! Geometric primitives for diagram import and band layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Chorus uses the coordinate system of BPMN DI, which is consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **Y-axis**: Increases downward, so a smaller `y` is visually higher

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use chorus_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(30.0, 40.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 20.0);
/// assert_eq!(mid.y(), 30.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates
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

    /// Adds another point to this point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Returns the point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Converts the point to bounds with the given size, centered on the point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
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

/// Represents a rectangular bounding box with minimum and maximum coordinates.
///
/// On the wire (DI records, snapshots) bounds use the BPMN DI shape
/// `{ "x", "y", "width", "height" }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectRepr", into = "RectRepr")]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates a new bounds from DI style `x`, `y`, `width`, `height` values
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new_from_top_left(Point::new(x, y), Size::new(width, height))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Moves the bounds vertically so that the top edge sits at `y`, keeping the size.
    pub fn with_y(self, y: f32) -> Self {
        Self::new_from_top_left(Point::new(self.min_x, y), self.to_size())
    }

    /// Keeps the top edge and changes the height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.max_y = self.min_y + height;
        self
    }

    /// Returns `true` if `point` lies inside the bounds or on its edge.
    pub fn contains_point(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Rounds `x`, `y`, `width` and `height` to whole numbers.
    ///
    /// Width and height are rounded on their own rather than derived from the
    /// rounded edges, so `10.4 + 99.6` stays `100` wide.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chorus_core::geometry::Bounds;
    /// let bounds = Bounds::from_rect(10.4, 20.6, 99.6, 40.2).rounded();
    /// assert_eq!(bounds.min_x(), 10.0);
    /// assert_eq!(bounds.min_y(), 21.0);
    /// assert_eq!(bounds.width(), 100.0);
    /// assert_eq!(bounds.height(), 40.0);
    /// ```
    pub fn rounded(self) -> Self {
        Self::from_rect(
            self.min_x.round(),
            self.min_y.round(),
            self.width().round(),
            self.height().round(),
        )
    }

    /// Rounds each edge to the nearest integer.
    ///
    /// Rectangles that share an edge still share it afterwards.
    pub fn snapped(self) -> Self {
        Self {
            min_x: self.min_x.round(),
            min_y: self.min_y.round(),
            max_x: self.max_x.round(),
            max_y: self.max_y.round(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RectRepr {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl From<RectRepr> for Bounds {
    fn from(rect: RectRepr) -> Self {
        Bounds::from_rect(rect.x, rect.y, rect.width, rect.height)
    }
}

impl From<Bounds> for RectRepr {
    fn from(bounds: Bounds) -> Self {
        RectRepr {
            x: bounds.min_x,
            y: bounds.min_y,
            width: bounds.width(),
            height: bounds.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_add() {
        let result = Point::new(1.0, 2.0).add_point(Point::new(3.0, 4.0));
        assert_eq!(result.x(), 4.0);
        assert_eq!(result.y(), 6.0);
    }

    #[test]
    fn test_point_midpoint() {
        let midpoint = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(midpoint.x(), 2.0);
        assert_eq!(midpoint.y(), 3.0);
    }

    #[test]
    fn test_point_to_bounds_is_centered() {
        let bounds = Point::new(50.0, 50.0).to_bounds(Size::new(20.0, 10.0));
        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 55.0);
    }

    #[test]
    fn test_bounds_from_rect() {
        let bounds = Bounds::from_rect(10.0, 20.0, 100.0, 80.0);
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 110.0);
        assert_eq!(bounds.max_y(), 100.0);
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 80.0);
        assert_eq!(bounds.center(), Point::new(60.0, 60.0));
    }

    #[test]
    fn test_bounds_with_y_keeps_size() {
        let bounds = Bounds::from_rect(10.0, 20.0, 100.0, 80.0).with_y(5.0);
        assert_eq!(bounds.min_y(), 5.0);
        assert_eq!(bounds.height(), 80.0);
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.width(), 100.0);
    }

    #[test]
    fn test_bounds_with_height_keeps_top() {
        let bounds = Bounds::from_rect(10.0, 20.0, 100.0, 80.0).with_height(20.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_y(), 40.0);
    }

    #[test]
    fn test_bounds_contains_point() {
        let bounds = Bounds::from_rect(0.0, 0.0, 100.0, 50.0);
        assert!(bounds.contains_point(Point::new(50.0, 25.0)));
        assert!(bounds.contains_point(Point::new(0.0, 0.0)));
        assert!(bounds.contains_point(Point::new(100.0, 50.0)));
        assert!(!bounds.contains_point(Point::new(100.1, 25.0)));
        assert!(!bounds.contains_point(Point::new(50.0, -1.0)));
    }

    #[test]
    fn test_bounds_snapped_keeps_shared_edges() {
        let upper = Bounds::from_rect(0.0, 0.0, 100.0, 100.0 / 3.0);
        let lower = Bounds::from_rect(0.0, upper.max_y(), 100.0, 100.0 / 3.0);

        let (upper, lower) = (upper.snapped(), lower.snapped());
        assert_eq!(upper.max_y(), lower.min_y());
        assert_eq!(upper.height(), 33.0);
        assert_eq!(lower.max_y(), 67.0);
    }

    #[test]
    fn test_bounds_rounded() {
        let bounds = Bounds::from_rect(10.4, 20.6, 35.5, 0.49).rounded();
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 21.0);
        assert_eq!(bounds.width(), 36.0);
        assert_eq!(bounds.height(), 0.0);
    }

    #[test]
    fn test_bounds_serde_uses_rect_shape() {
        let bounds: Bounds =
            serde_json::from_str(r#"{"x": 5, "y": 6, "width": 10, "height": 20}"#).unwrap();
        assert_eq!(bounds, Bounds::from_rect(5.0, 6.0, 10.0, 20.0));

        let json = serde_json::to_value(bounds).unwrap();
        assert_eq!(json["x"], 5.0);
        assert_eq!(json["height"], 20.0);
    }
}
