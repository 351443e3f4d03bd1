//! Geometric primitives for contour analysis.
//!
//! Provides point representations, axis-aligned contour bounds, convex hull
//! computation, and the minimum enclosing circle used as a seal's size
//! proxy. The enclosing circle is exact: it is built incrementally over the
//! contour's convex hull, which keeps the cubic worst case of the
//! incremental construction confined to the small hull point set.

use imageproc::contours::Contour;
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// A circle defined by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center of the circle.
    pub center: Point,
    /// Radius of the circle.
    pub radius: f32,
}

impl Circle {
    /// Slack applied to containment checks to absorb floating-point error.
    const EPS: f32 = 1e-4;

    fn contains(&self, p: &Point) -> bool {
        self.center.distance_sq(p) <= (self.radius + Self::EPS) * (self.radius + Self::EPS)
    }

    fn from_two(a: &Point, b: &Point) -> Self {
        let center = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let radius = (center.distance_sq(a)).sqrt();
        Self { center, radius }
    }

    /// Circumscribed circle of a triangle. Falls back to the widest
    /// two-point circle when the points are (nearly) collinear.
    fn from_three(a: &Point, b: &Point, c: &Point) -> Self {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < 1e-9 {
            let ab = Self::from_two(a, b);
            let ac = Self::from_two(a, c);
            let bc = Self::from_two(b, c);
            let mut best = ab;
            if ac.radius > best.radius {
                best = ac;
            }
            if bc.radius > best.radius {
                best = bc;
            }
            return best;
        }
        let a2 = a.x * a.x + a.y * a.y;
        let b2 = b.x * b.x + b.y * b.y;
        let c2 = c.x * c.x + c.y * c.y;
        let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        let center = Point::new(ux, uy);
        let radius = center.distance_sq(a).sqrt();
        Self { center, radius }
    }
}

/// Converts an imageproc contour into floating-point points.
pub fn contour_points(contour: &Contour<i32>) -> Vec<Point> {
    contour
        .points
        .iter()
        .map(|p| Point::new(p.x as f32, p.y as f32))
        .collect()
}

/// Axis-aligned integer bounds of a contour: `(x, y, width, height)`.
///
/// Width and height are inclusive of both extreme pixels, matching the
/// bounding-rectangle convention of raster contours. Returns `None` for an
/// empty contour.
pub fn contour_bounds(contour: &Contour<i32>) -> Option<(i32, i32, i32, i32)> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Computes the convex hull of a point set using Graham's scan.
///
/// Returns the input unchanged when it has fewer than 3 points.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut points = points.to_vec();

    // Find the point with the lowest y-coordinate (and leftmost if tied).
    let mut start_idx = 0;
    for i in 1..points.len() {
        if points[i].y < points[start_idx].y
            || (points[i].y == points[start_idx].y && points[i].x < points[start_idx].x)
        {
            start_idx = i;
        }
    }
    points.swap(0, start_idx);
    let start_point = points[0];

    // Sort the remainder by polar angle around the start point.
    points[1..].sort_by(|a, b| {
        let cross = cross_product(&start_point, a, b);
        if cross == 0.0 {
            let dist_a = start_point.distance_sq(a);
            let dist_b = start_point.distance_sq(b);
            dist_a
                .partial_cmp(&dist_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        } else if cross > 0.0 {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    });

    let mut hull: Vec<Point> = Vec::new();
    for point in points {
        while hull.len() > 1
            && cross_product(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
        {
            hull.pop();
        }
        hull.push(point);
    }

    hull
}

/// Cross product of the vectors `p1->p2` and `p1->p3`.
///
/// Positive for a counter-clockwise turn, negative for clockwise, zero for
/// collinear points.
fn cross_product(p1: &Point, p2: &Point, p3: &Point) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

/// Computes the minimum circle fully containing the given point set.
///
/// Returns `None` for an empty set. A single point yields a zero-radius
/// circle. For a non-circular shape the circle diameter reflects the
/// shape's widest extent, not its area.
pub fn min_enclosing_circle(points: &[Point]) -> Option<Circle> {
    if points.is_empty() {
        return None;
    }
    if points.len() == 1 {
        return Some(Circle {
            center: points[0],
            radius: 0.0,
        });
    }

    // Only hull points can lie on the minimal circle.
    let hull = convex_hull(points);
    let pts = if hull.len() >= 2 { hull } else { points.to_vec() };

    let mut circle = Circle::from_two(&pts[0], &pts[1]);
    for i in 2..pts.len() {
        if circle.contains(&pts[i]) {
            continue;
        }
        // pts[i] must lie on the boundary of the new circle.
        circle = Circle::from_two(&pts[0], &pts[i]);
        for j in 1..i {
            if circle.contains(&pts[j]) {
                continue;
            }
            circle = Circle::from_two(&pts[j], &pts[i]);
            for k in 0..j {
                if !circle.contains(&pts[k]) {
                    circle = Circle::from_three(&pts[k], &pts[j], &pts[i]);
                }
            }
        }
    }
    Some(circle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_of_two_points() {
        let circle = min_enclosing_circle(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0)]).unwrap();
        assert!((circle.radius - 2.0).abs() < 1e-4);
        assert!((circle.center.x - 2.0).abs() < 1e-4);
        assert!((circle.center.y).abs() < 1e-4);
    }

    #[test]
    fn test_circle_of_square() {
        // Unit square: the minimal circle passes through all four corners.
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let circle = min_enclosing_circle(&corners).unwrap();
        assert!((circle.radius - (0.5f32 * 2.0f32.sqrt())).abs() < 1e-3);
        assert!((circle.center.x - 0.5).abs() < 1e-3);
        assert!((circle.center.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_circle_of_ring_samples() {
        // Points sampled on a circle of radius 10 around (5, 5).
        let points: Vec<Point> = (0..36)
            .map(|i| {
                let angle = i as f32 * 10.0f32.to_radians();
                Point::new(5.0 + 10.0 * angle.cos(), 5.0 + 10.0 * angle.sin())
            })
            .collect();
        let circle = min_enclosing_circle(&points).unwrap();
        assert!((circle.radius - 10.0).abs() < 1e-2);
        assert!((circle.center.x - 5.0).abs() < 1e-2);
        assert!((circle.center.y - 5.0).abs() < 1e-2);
    }

    #[test]
    fn test_interior_points_ignored() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, -1.0),
        ];
        let circle = min_enclosing_circle(&points).unwrap();
        assert!((circle.radius - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(min_enclosing_circle(&[]).is_none());
        let c = min_enclosing_circle(&[Point::new(3.0, 4.0)]).unwrap();
        assert_eq!(c.radius, 0.0);
        assert_eq!(c.center, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_convex_hull_drops_interior() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(2.0, 2.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(2.0, 2.0)));
    }
}
