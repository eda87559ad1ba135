use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned bounding box.
///
/// Stored as top-left corner plus size; constructors accept the formats
/// detectors and zone files commonly use:
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - XYWH: Center X, Center Y, Width, Height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the box
    pub width: f32,
    /// Height of the box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect centered on `(cx, cy)`.
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    #[inline]
    pub fn x2(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn y2(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Finite coordinates with strictly positive extent on both axes.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Inclusive containment on all four edges.
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.x <= point.x && point.x <= self.x2() && self.y <= point.y && point.y <= self.y2()
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Multiply every coordinate by the per-axis factors.
    pub fn scale(&self, sx: f32, sy: f32) -> Rect {
        Rect::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Area of the intersection with another box, zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x2().min(other.x2());
        let y2 = self.y2().min(other.y2());

        (x2 - x1).max(0.0) * (y2 - y1).max(0.0)
    }

    /// Calculate Intersection over Union (IoU) with another box.
    pub fn iou(&self, other: &Rect) -> f32 {
        let inter_area = self.intersection_area(other);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Fraction of `bbox` covered by `region` (intersection over the bbox area).
pub fn overlap_ratio(bbox: &Rect, region: &Rect) -> f32 {
    let area = bbox.area();
    if area > 0.0 {
        bbox.intersection_area(region) / area
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_from_xywh() {
        let rect = Rect::from_xywh(150.0, 150.0, 40.0, 60.0);
        assert_eq!(rect.to_tlbr(), [130.0, 120.0, 170.0, 180.0]);
        assert_eq!(rect.center(), Point::new(150.0, 150.0));
    }

    #[test]
    fn test_iou() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_expand_and_scale() {
        let rect = Rect::from_tlbr(100.0, 100.0, 200.0, 200.0);
        assert_eq!(rect.expand(10.0).to_tlbr(), [90.0, 90.0, 210.0, 210.0]);
        assert_eq!(rect.scale(2.0, 3.0).to_tlbr(), [200.0, 300.0, 400.0, 600.0]);
    }

    #[test]
    fn test_is_valid() {
        assert!(Rect::from_tlbr(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::from_tlbr(5.0, 0.0, 5.0, 1.0).is_valid());
        assert!(!Rect::from_tlbr(0.0, 3.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_valid());
    }

    #[test]
    fn test_overlap_ratio() {
        let bbox = Rect::from_tlbr(0.0, 0.0, 10.0, 10.0);
        let region = Rect::from_tlbr(5.0, 0.0, 20.0, 20.0);
        assert!((overlap_ratio(&bbox, &region) - 0.5).abs() < 1e-6);
        assert_eq!(overlap_ratio(&bbox, &Rect::from_tlbr(50.0, 50.0, 60.0, 60.0)), 0.0);
    }
}
