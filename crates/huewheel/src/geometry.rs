use crate::color::Hsb;
use crate::config::WheelConfig;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `self` as seen from `center`, in `(-π, π]`.
    pub fn angle_from(self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }

    pub fn rotated_about(self, center: Point, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        let (dx, dy) = (self.x - center.x, self.y - center.y);
        Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Maps an angle into `[0, 2π)`. Non-finite input maps to `0`.
pub fn normalize_angle(radians: f64) -> f64 {
    if !radians.is_finite() {
        return 0.0;
    }
    let normalized = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if normalized >= TAU { 0.0 } else { normalized }
}

/// Pure (angle, distance) <-> (position, color) mapping for one wheel configuration.
///
/// Angles are clockwise-positive in screen space; distances are normalized to
/// the wheel radius, `0` being the center swatch and `1` the outermost ring.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    config: &'a WheelConfig,
}

impl<'a> Mapper<'a> {
    pub fn new(config: &'a WheelConfig) -> Self {
        Self { config }
    }

    pub fn dot_radius(&self, distance: f64) -> f64 {
        if distance <= 0.0 || distance.is_nan() {
            return self.config.center_radius;
        }
        self.config
            .min_dot_radius
            .max(self.config.max_dot_radius * distance)
    }

    /// Position of a dot, with the per-ring angular shift applied.
    pub fn position(&self, center: Point, outer_radius: f64, angle: f64, distance: f64) -> Point {
        self.place(
            center,
            outer_radius,
            angle,
            distance,
            self.config.shift_degree,
        )
    }

    /// Position of a dot ignoring the per-ring shift (used for the highlight ring).
    pub fn unshifted_position(
        &self,
        center: Point,
        outer_radius: f64,
        angle: f64,
        distance: f64,
    ) -> Point {
        self.place(center, outer_radius, angle, distance, 0.0)
    }

    fn place(
        &self,
        center: Point,
        outer_radius: f64,
        angle: f64,
        distance: f64,
        shift_degree: f64,
    ) -> Point {
        let shifted = angle + shift_degree.to_radians() * distance;
        let reach = (outer_radius - self.config.padding) * distance;
        Point::new(
            center.x + reach * (-shifted).cos(),
            center.y + reach * (-shifted).sin(),
        )
    }

    pub fn color_at(&self, angle: f64, distance: f64, brightness: f64) -> Hsb {
        Hsb::new(normalize_angle(angle) / TAU, distance, brightness)
    }
}
