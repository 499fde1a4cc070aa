use crate::color::Hsb;
use crate::config::WheelConfig;
use crate::geometry::{Mapper, Point};
use std::f64::consts::{PI, TAU};

/// Upper bound on rings per layout pass, guards against geometry that never shrinks.
pub const MAX_RINGS: usize = 4096;
pub const MAX_DOTS_PER_RING: usize = 4096;

/// One concentric circle of dots. Recomputed on every layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Normalized distance from the center, `0` for the center swatch.
    pub distance: f64,
    /// Distance from the center in points.
    pub radius: f64,
    pub dot_radius: f64,
    /// Angular shift applied to the whole ring, in radians.
    pub shift: f64,
    pub angles: Vec<f64>,
}

impl Ring {
    fn center(config: &WheelConfig) -> Self {
        Self {
            distance: 0.0,
            radius: 0.0,
            dot_radius: Mapper::new(config).dot_radius(0.0),
            shift: 0.0,
            angles: vec![0.0],
        }
    }

    pub fn is_center(&self) -> bool {
        self.distance == 0.0
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

/// How many dots of `dot_radius` fit on a ring of `ring_radius`. Always at least one.
pub fn dots_on_ring(dot_radius: f64, ring_radius: f64, density: f64) -> usize {
    if !(ring_radius > 0.0) || 2.0 * dot_radius > ring_radius {
        return 1;
    }
    let fitting = density * PI / (2.0 * dot_radius / ring_radius).asin();
    if fitting.is_nan() {
        return 1;
    }
    (fitting.floor().min(MAX_DOTS_PER_RING as f64) as usize).max(1)
}

/// Evenly spaced angles for `count` dots. The first and last dot share a
/// position since the step is `2π / (count - 1)`.
pub fn arc_positions(count: usize) -> Vec<f64> {
    if count <= 1 {
        return vec![0.0];
    }
    let step = TAU / (count - 1) as f64;
    (0..count).map(|i| i as f64 * step).collect()
}

/// Lays out rings from `outer_radius` inward. The last ring is always the center swatch.
pub fn layout(outer_radius: f64, config: &WheelConfig) -> Vec<Ring> {
    let mapper = Mapper::new(config);
    let mut rings = Vec::new();

    if outer_radius.is_finite() && outer_radius > 0.0 {
        let mut inner_radius = outer_radius;
        let mut prev_dot_radius = mapper.dot_radius(1.0);

        loop {
            let distance = inner_radius / outer_radius;
            let dot_radius = mapper.dot_radius(distance);
            let count = dots_on_ring(dot_radius, inner_radius, config.density);

            rings.push(Ring {
                distance,
                radius: inner_radius,
                dot_radius,
                shift: config.shift_degree.to_radians() * distance,
                angles: arc_positions(count),
            });

            let step = prev_dot_radius + 2.0 * dot_radius + config.inner_padding;
            inner_radius -= step;
            prev_dot_radius = dot_radius;

            if inner_radius <= 2.0 * config.center_radius + dot_radius {
                break;
            }
            if !(step > 0.0) || rings.len() >= MAX_RINGS {
                log::warn!(
                    "Ring layout stopped after {} rings (step {step}, radius {inner_radius})",
                    rings.len()
                );
                break;
            }
        }
    }

    rings.push(Ring::center(config));
    log::trace!("Laid out {} rings for radius {outer_radius}", rings.len());
    rings
}

/// A single filled circle to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: Point,
    pub radius: f64,
    pub color: Hsb,
}

pub fn dots<'a>(
    rings: &'a [Ring],
    center: Point,
    outer_radius: f64,
    mapper: Mapper<'a>,
    brightness: f64,
) -> impl Iterator<Item = Dot> + 'a {
    rings.iter().flat_map(move |ring| {
        ring.angles.iter().map(move |&angle| Dot {
            center: mapper.position(center, outer_radius, angle, ring.distance),
            radius: ring.dot_radius,
            color: mapper.color_at(angle, ring.distance, brightness),
        })
    })
}
