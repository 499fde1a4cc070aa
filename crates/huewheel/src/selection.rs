use crate::color::Hsb;
use crate::config::WheelConfig;
use crate::geometry::{Mapper, Point, normalize_angle};
use std::f64::consts::TAU;

/// Distance from `point` to `center`, normalized to the wheel radius.
/// `0` is the center, `1` lies on the outer radius.
pub fn normalized_distance(point: Point, center: Point, outer_radius: f64) -> f64 {
    if !(outer_radius > 0.0) {
        return f64::INFINITY;
    }
    point.distance_to(center) / outer_radius
}

/// Angle under `point` with the per-ring shift taken back out.
///
/// This mirrors the shift applied during layout but ignores the padding that
/// layout subtracts from the reach, so for `padding > 0` it is an
/// approximation of the true inverse.
pub fn adjusted_angle(center: Point, point: Point, distance: f64, shift_degree: f64) -> f64 {
    let radians = normalize_angle(point.angle_from(center));
    TAU - (radians + shift_degree.to_radians() * distance)
}

type Listener = Box<dyn FnMut(Hsb)>;

/// Turns taps into colors and reports them to a single listener.
#[derive(Default)]
pub struct SelectionResolver {
    listener: Option<Listener>,
}

impl std::fmt::Debug for SelectionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionResolver")
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl SelectionResolver {
    pub fn set_listener(&mut self, listener: impl FnMut(Hsb) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Color under `point`, or `None` when the point is outside the wheel.
    pub fn resolve(
        &self,
        point: Point,
        center: Point,
        outer_radius: f64,
        config: &WheelConfig,
        brightness: f64,
    ) -> Option<Hsb> {
        let distance = normalized_distance(point, center, outer_radius);
        if !(distance <= 1.0) {
            return None;
        }
        let angle = adjusted_angle(center, point, distance, config.shift_degree);
        Some(Mapper::new(config).color_at(angle, distance, brightness))
    }

    /// Resolves a tap and notifies the listener once if it hit the wheel.
    pub fn tap(
        &mut self,
        point: Point,
        center: Point,
        outer_radius: f64,
        config: &WheelConfig,
        brightness: f64,
    ) -> Option<Hsb> {
        let color = self.resolve(point, center, outer_radius, config, brightness)?;
        log::debug!("Selected {}", color.to_hex());
        if let Some(listener) = self.listener.as_mut() {
            listener(color);
        }
        Some(color)
    }
}
