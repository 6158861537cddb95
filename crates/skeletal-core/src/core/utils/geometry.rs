use nalgebra::{Point2, Point3, Rotation2, Vector2};
use std::f64::consts::TAU;

pub fn xy(position: &Point3<f64>) -> Point2<f64> {
    Point2::new(position.x, position.y)
}

pub fn set_xy(position: &mut Point3<f64>, planar: Point2<f64>) {
    position.x = planar.x;
    position.y = planar.y;
}

pub fn rotate(v: &Vector2<f64>, angle_degrees: f64) -> Vector2<f64> {
    Rotation2::new(angle_degrees.to_radians()) * v
}

pub fn perpendicular(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

pub fn direction_or_x(from: &Point2<f64>, to: &Point2<f64>) -> Vector2<f64> {
    let delta = to - from;
    if delta.norm_squared() < 1e-24 {
        Vector2::x()
    } else {
        delta.normalize()
    }
}

pub fn angle_of(v: &Vector2<f64>) -> f64 {
    let angle = v.y.atan2(v.x);
    if angle < 0.0 { angle + TAU } else { angle }
}

pub fn unit_from_angle(angle: f64) -> Vector2<f64> {
    Vector2::new(angle.cos(), angle.sin())
}

pub fn polygon_circumradius(sides: usize, side_length: f64) -> f64 {
    side_length / (2.0 * (std::f64::consts::PI / sides as f64).sin())
}

pub fn polygon_apothem(sides: usize, side_length: f64) -> f64 {
    side_length / (2.0 * (std::f64::consts::PI / sides as f64).tan())
}

pub fn reflect_across_line(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> Point2<f64> {
    let axis = b - a;
    if axis.norm_squared() < 1e-24 {
        return *p;
    }
    let axis = axis.normalize();
    let offset = p - a;
    a + (axis * (2.0 * offset.dot(&axis)) - offset)
}

pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 { wrapped + TAU } else { wrapped }
}

/// Returns `(start, size)` of the widest angular gap between the given
/// directions around a common center. An empty slice yields the full circle
/// starting at angle zero.
pub fn largest_angular_gap(angles: &[f64]) -> (f64, f64) {
    if angles.is_empty() {
        return (0.0, TAU);
    }
    let mut sorted: Vec<f64> = angles.iter().map(|&a| normalize_angle(a)).collect();
    sorted.sort_unstable_by(f64::total_cmp);

    let mut best_start = *sorted.last().unwrap_or(&0.0);
    let mut best_size = TAU - (sorted[sorted.len() - 1] - sorted[0]);
    for pair in sorted.windows(2) {
        let size = pair[1] - pair[0];
        if size > best_size {
            best_size = size;
            best_start = pair[0];
        }
    }
    (best_start, best_size)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    pub fn from_points<I: IntoIterator<Item = Point2<f64>>>(points: I) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect {
            min: first,
            max: first,
        };
        for p in iter {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn rotate_quarter_turn() {
        let rotated = rotate(&Vector2::x(), 90.0);
        assert!((rotated.x - 0.0).abs() < TOLERANCE);
        assert!((rotated.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn perpendicular_is_left_turn() {
        let p = perpendicular(&Vector2::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < TOLERANCE);
        assert!((p.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn direction_falls_back_for_coincident_points() {
        let p = Point2::new(2.0, 3.0);
        assert_eq!(direction_or_x(&p, &p), Vector2::x());
        let d = direction_or_x(&Point2::origin(), &Point2::new(0.0, 2.0));
        assert!((d.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn hexagon_circumradius_equals_side() {
        assert!((polygon_circumradius(6, 1.5) - 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn square_apothem_is_half_side() {
        assert!((polygon_apothem(4, 2.0) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn reflect_across_horizontal_line() {
        let reflected = reflect_across_line(
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((reflected.x - 1.0).abs() < TOLERANCE);
        assert!((reflected.y + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn reflection_is_involutive() {
        let a = Point2::new(-1.0, 2.0);
        let b = Point2::new(3.0, 0.5);
        let p = Point2::new(0.3, -4.0);
        let twice = reflect_across_line(&reflect_across_line(&p, &a, &b), &a, &b);
        assert!((twice - p).norm() < TOLERANCE);
    }

    #[test]
    fn angle_of_covers_all_quadrants() {
        assert!((angle_of(&Vector2::new(1.0, 0.0)) - 0.0).abs() < TOLERANCE);
        assert!((angle_of(&Vector2::new(0.0, 1.0)) - TAU / 4.0).abs() < TOLERANCE);
        assert!((angle_of(&Vector2::new(-1.0, 0.0)) - TAU / 2.0).abs() < TOLERANCE);
        assert!((angle_of(&Vector2::new(0.0, -1.0)) - 3.0 * TAU / 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn largest_gap_of_two_directions() {
        let (start, size) = largest_angular_gap(&[0.0, TAU / 4.0]);
        assert!((start - TAU / 4.0).abs() < TOLERANCE);
        assert!((size - 3.0 * TAU / 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn largest_gap_of_single_direction_is_full_circle() {
        let (start, size) = largest_angular_gap(&[1.0]);
        assert!((start - 1.0).abs() < TOLERANCE);
        assert!((size - TAU).abs() < TOLERANCE);
    }

    #[test]
    fn empty_gap_defaults_to_full_circle() {
        let (start, size) = largest_angular_gap(&[]);
        assert_eq!(start, 0.0);
        assert!((size - TAU).abs() < TOLERANCE);
    }

    #[test]
    fn rect_from_points_and_overlap() {
        let a = Rect::from_points([
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, -1.0),
        ])
        .unwrap();
        assert_eq!(a.min, Point2::new(0.0, -1.0));
        assert_eq!(a.max, Point2::new(2.0, 1.0));
        assert!((a.width() - 2.0).abs() < TOLERANCE);
        assert!((a.height() - 2.0).abs() < TOLERANCE);

        let b = Rect {
            min: Point2::new(1.5, 0.5),
            max: Point2::new(3.0, 2.0),
        };
        let c = Rect {
            min: Point2::new(2.5, 2.5),
            max: Point2::new(3.0, 3.0),
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(Rect::from_points(std::iter::empty()).is_none());
    }
}
