//! Axis-aligned hit-test shapes
//!
//! Every test here is strict: shapes that only touch along an edge (or at a
//! single point) do not intersect.

use glam::Vec2;

/// Axis-aligned rectangle anchored at its lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.top() <= other.bottom()
            || self.bottom() >= other.top())
    }

    /// Overlap depth on each axis (negative or zero when separated)
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        Vec2::new(
            self.right().min(other.right()) - self.left().max(other.left()),
            self.top().min(other.top()) - self.bottom().max(other.bottom()),
        )
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x > self.left() && point.x < self.right() && point.y > self.bottom() && point.y < self.top()
    }

    fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.bottom(), self.top()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest = rect.closest_point(self.center);
        self.center.distance_squared(closest) < self.radius * self.radius
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_center(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// A collider's world-space shape for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.intersects(b),
            (Shape::Circle(a), Shape::Circle(b)) => a.intersects(b),
            (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
                c.intersects_rect(r)
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => r.center(),
            Shape::Circle(c) => c.center,
        }
    }

    /// Axis-aligned bounds, used for broad-phase bucketing
    pub fn bounding_rect(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => c.bounding_rect(),
        }
    }
}

/// Unit normal pointing from `a` towards `b`
///
/// Rectangle pairs resolve along the axis of minimum penetration; pairs
/// involving a circle use the centre-to-centre direction. A degenerate
/// (zero-length) direction falls back to `(1, 0)`.
pub fn collision_normal(a: &Shape, b: &Shape) -> Vec2 {
    let delta = b.center() - a.center();
    let raw = match (a, b) {
        (Shape::Rect(ra), Shape::Rect(rb)) => {
            let overlap = ra.overlap(rb);
            if overlap.x < overlap.y {
                Vec2::new(delta.x, 0.0)
            } else {
                Vec2::new(0.0, delta.y)
            }
        }
        _ => delta,
    };
    unit_or_default(raw)
}

/// Normalize, defaulting zero-length input to `(1, 0)`
pub fn unit_or_default(v: Vec2) -> Vec2 {
    if v.length_squared() > 0.0 {
        v.normalize()
    } else {
        Vec2::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let right = rect(10.0, 0.0, 10.0, 10.0);
        let above = rect(0.0, 10.0, 10.0, 10.0);
        let corner = rect(10.0, 10.0, 5.0, 5.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&above));
        assert!(!a.intersects(&corner));
    }

    #[test]
    fn test_circle_rect() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(Circle::new(Vec2::new(12.0, 5.0), 3.0).intersects_rect(&r));
        // Exactly touching the right edge
        assert!(!Circle::new(Vec2::new(13.0, 5.0), 3.0).intersects_rect(&r));
    }

    #[test]
    fn test_circles_touching_do_not_intersect() {
        let a = Circle::new(Vec2::ZERO, 1.0);
        let b = Circle::new(Vec2::new(2.0, 0.0), 1.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Circle::new(Vec2::new(1.9, 0.0), 1.0)));
    }

    #[test]
    fn test_normal_uses_min_penetration_axis() {
        // Deep vertical overlap, shallow horizontal overlap -> push along x
        let a = Shape::Rect(rect(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Rect(rect(8.0, 1.0, 10.0, 10.0));
        assert_eq!(collision_normal(&a, &b), Vec2::X);
        assert_eq!(collision_normal(&b, &a), -Vec2::X);

        let c = Shape::Rect(rect(1.0, 9.0, 10.0, 10.0));
        assert_eq!(collision_normal(&a, &c), Vec2::Y);
    }

    #[test]
    fn test_degenerate_normal_defaults_to_x() {
        let a = Shape::Circle(Circle::new(Vec2::new(3.0, 3.0), 1.0));
        assert_eq!(collision_normal(&a, &a), Vec2::X);
        assert_eq!(unit_or_default(Vec2::ZERO), Vec2::X);
    }
}
