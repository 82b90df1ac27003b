//! Unit conversion and bounding-box helpers
//!
//! The host stores lengths in feet ("internal units"); everything the
//! planner computes is in millimeters on the sheet.

use crate::constants::MM_PER_INTERNAL_UNIT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Convert millimeters to host internal units
#[inline]
pub fn to_internal(mm: f64) -> f64 {
    mm / MM_PER_INTERNAL_UNIT
}

/// Convert host internal units to millimeters
#[inline]
pub fn to_millimeters(internal: f64) -> f64 {
    internal * MM_PER_INTERNAL_UNIT
}

/// A point in host internal units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in host internal units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box spanning `width` × `height` millimeters with its lower-left corner at the origin
    pub fn from_size_mm(width_mm: f64, height_mm: f64) -> Self {
        Self::new(
            Point::new(0.0, 0.0),
            Point::new(to_internal(width_mm), to_internal(height_mm)),
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// A box is usable for scaling only when both extents are finite and positive
    pub fn is_valid(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Scale both extents by `factor`, keeping the center fixed
    pub fn scaled_about_center(&self, factor: f64) -> Self {
        let center = self.center();
        let half_w = self.width() * factor / 2.0;
        let half_h = self.height() * factor / 2.0;
        Self::new(
            Point::new(center.x - half_w, center.y - half_h),
            Point::new(center.x + half_w, center.y + half_h),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Fit a box inside `max_width_mm` × `max_height_mm` and re-center it.
///
/// The largest uniform factor that fits both extents is multiplied by
/// `fill_ratio` to leave a visual margin. The returned box keeps the
/// original center. Returns `None` for degenerate boxes or maxima.
pub fn scale_and_center_box(
    bbox: &BoundingBox,
    max_width_mm: f64,
    max_height_mm: f64,
    fill_ratio: f64,
) -> Option<BoundingBox> {
    if !bbox.is_valid() || !(max_width_mm > 0.0) || !(max_height_mm > 0.0) {
        return None;
    }

    let scale_w = to_internal(max_width_mm) / bbox.width();
    let scale_h = to_internal(max_height_mm) / bbox.height();
    let factor = scale_w.min(scale_h) * fill_ratio;

    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }

    Some(bbox.scaled_about_center(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "expected {b}, got {a}");
    }

    #[test]
    fn test_unit_round_trip() {
        for x in [0.001, 1.0, 12.5, 304.8, 841.0, 123_456.789] {
            assert_close(to_internal(to_millimeters(x)), x);
            assert_close(to_millimeters(to_internal(x)), x);
        }
    }

    #[test]
    fn test_one_foot() {
        assert_close(to_internal(304.8), 1.0);
        assert_close(to_millimeters(2.0), 609.6);
    }

    #[test]
    fn test_scale_width_limited() {
        // 10ft × 5ft box, allowed 304.8mm × 304.8mm (1ft × 1ft)
        let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
        let scaled = scale_and_center_box(&bbox, 304.8, 304.8, 0.9).unwrap();

        // Width governs: factor = 0.1 * 0.9
        assert_close(scaled.width(), 0.9);
        assert_close(scaled.height(), 0.45);
        assert_close(scaled.center().x, 5.0);
        assert_close(scaled.center().y, 2.5);
    }

    #[test]
    fn test_scale_can_enlarge() {
        let bbox = BoundingBox::new(Point::new(-0.5, -0.5), Point::new(0.5, 0.5));
        let scaled = scale_and_center_box(&bbox, 609.6, 914.4, 1.0).unwrap();

        assert_close(scaled.width(), 2.0);
        assert_close(scaled.height(), 2.0);
        assert_close(scaled.center().x, 0.0);
    }

    #[test]
    fn test_degenerate_box_is_rejected() {
        let flat = BoundingBox::new(Point::new(0.0, 0.0), Point::new(3.0, 0.0));
        assert!(scale_and_center_box(&flat, 100.0, 100.0, 0.9).is_none());

        let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(3.0, 3.0));
        assert!(scale_and_center_box(&bbox, 0.0, 100.0, 0.9).is_none());
        assert!(scale_and_center_box(&bbox, f64::NAN, 100.0, 0.9).is_none());
    }
}
