#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! A panel group lays its panels out along a single [`Axis`]. Everything the
//! sizing engine computes is one-dimensional, so the main currency here is the
//! [`Span`]: an offset and a length along that axis, in pixels.

use serde::{Deserialize, Serialize};

/// Main axis of a panel group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Panels side by side, left to right; dividers are vertical bars.
    #[default]
    Row,
    /// Panels stacked top to bottom; dividers are horizontal bars.
    Column,
}

impl Axis {
    /// Project a point onto this axis.
    #[inline]
    #[must_use]
    pub const fn main(self, point: Point) -> f64 {
        match self {
            Self::Row => point.x,
            Self::Column => point.y,
        }
    }

    /// Project a point onto the perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self, point: Point) -> f64 {
        match self {
            Self::Row => point.y,
            Self::Column => point.x,
        }
    }

    /// The other axis.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// A pointer or layout position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a point that lies at `main` along `axis` and 0 across it.
    #[inline]
    #[must_use]
    pub const fn on_axis(axis: Axis, main: f64) -> Self {
        match axis {
            Axis::Row => Self::new(main, 0.0),
            Axis::Column => Self::new(0.0, main),
        }
    }
}

/// A one-dimensional extent along a group's main axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive).
    pub offset: f64,
    /// Length in pixels.
    pub length: f64,
}

impl Span {
    /// Create a new span.
    #[inline]
    #[must_use]
    pub const fn new(offset: f64, length: f64) -> Self {
        Self { offset, length }
    }

    /// End position (exclusive).
    #[inline]
    #[must_use]
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }

    /// Midpoint of the span.
    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        self.offset + self.length / 2.0
    }

    /// Check if the span has no length.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length <= 0.0
    }

    /// Check if a position lies inside the span (`offset <= pos < end`).
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.offset && pos < self.end()
    }

    /// Grow the span by `amount` on both sides.
    ///
    /// Used for divider hit testing, where a thin (or zero-width) divider
    /// still needs a grabbable region.
    #[inline]
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        let amount = amount.max(0.0);
        Self::new(self.offset - amount, self.length + amount * 2.0)
    }

    /// Distance from `pos` to the nearest edge of the span, 0 when inside.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, pos: f64) -> f64 {
        if pos < self.offset {
            self.offset - pos
        } else if pos > self.end() {
            pos - self.end()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_projects_points() {
        let p = Point::new(3.0, 9.0);
        assert_eq!(Axis::Row.main(p), 3.0);
        assert_eq!(Axis::Row.cross(p), 9.0);
        assert_eq!(Axis::Column.main(p), 9.0);
        assert_eq!(Axis::Column.cross(p), 3.0);
        assert_eq!(Axis::Row.flipped(), Axis::Column);
    }

    #[test]
    fn point_on_axis_round_trips_through_main() {
        for axis in [Axis::Row, Axis::Column] {
            assert_eq!(axis.main(Point::on_axis(axis, 42.5)), 42.5);
            assert_eq!(axis.cross(Point::on_axis(axis, 42.5)), 0.0);
        }
    }

    #[test]
    fn span_edges_and_containment() {
        let span = Span::new(10.0, 5.0);
        assert_eq!(span.end(), 15.0);
        assert_eq!(span.center(), 12.5);
        assert!(span.contains(10.0));
        assert!(span.contains(14.9));
        assert!(!span.contains(15.0));
        assert!(!span.contains(9.9));
    }

    #[test]
    fn zero_length_span_is_empty_but_inflatable() {
        let divider = Span::new(100.0, 0.0);
        assert!(divider.is_empty());
        assert!(!divider.contains(100.0));

        let grab = divider.inflate(4.0);
        assert_eq!(grab, Span::new(96.0, 8.0));
        assert!(grab.contains(100.0));
        assert!(grab.contains(96.0));
    }

    #[test]
    fn negative_inflate_is_ignored() {
        let span = Span::new(1.0, 2.0);
        assert_eq!(span.inflate(-5.0), span);
    }

    #[test]
    fn distance_to_edges() {
        let span = Span::new(10.0, 10.0);
        assert_eq!(span.distance_to(5.0), 5.0);
        assert_eq!(span.distance_to(15.0), 0.0);
        assert_eq!(span.distance_to(26.0), 6.0);
    }

    #[test]
    fn axis_serializes_snake_case() {
        let json = serde_json::to_string(&Axis::Column).expect("serialize axis");
        assert_eq!(json, "\"column\"");
        let back: Axis = serde_json::from_str("\"row\"").expect("deserialize axis");
        assert_eq!(back, Axis::Row);
    }
}
