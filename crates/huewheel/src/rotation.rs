//! Rotation gestures that drive the global brightness.
//!
//! A single rotation arc in `[0, 2π]` maps linearly onto brightness. Pan
//! (one finger) and twist (two fingers) gestures move the arc; past either
//! end the wheel follows with elastic resistance and springs back on release.
//! A fast release keeps spinning with a short ease-out momentum animation.

use crate::color::Brightness;
use crate::tween::{Easing, Spring, Tween};
use derive_more::Display;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub const MAX_ROTATION_SPEED: f64 = 0.7;
pub const MIN_SPEED_THRESHOLD: f64 = 0.06;
/// rad/s^2
pub const DECELERATION: f64 = 0.1;
pub const MOMENTUM_DURATION: f64 = 0.5;
/// Furthest the wheel visually travels past either end of the range.
pub const ELASTIC_LIMIT: f64 = PI / 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RotationDirection {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn sign(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Motion {
    Momentum,
    SnapBack,
    /// Requested through the brightness API rather than by a gesture.
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RotationState {
    #[default]
    Idle,
    PanTracking,
    RotateTracking,
    #[display("Animating({_0})")]
    Animating(Motion),
}

/// Last three angular movements with their timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureSamples {
    deltas: [f64; 3],
    times: [f64; 3],
    len: usize,
}

impl GestureSamples {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn push(&mut self, delta: f64, time: f64) {
        self.deltas.rotate_left(1);
        self.times.rotate_left(1);
        self.deltas[2] = delta;
        self.times[2] = time;
        self.len = (self.len + 1).min(3);
    }

    /// Angular release speed, capped at [`MAX_ROTATION_SPEED`] and signed by `direction`.
    pub fn radial_speed(&self, direction: RotationDirection) -> f64 {
        let distance: f64 = self.deltas.iter().map(|d| d.abs()).sum();
        let elapsed = (self.times[2] - self.times[0]) * 10.0;
        if !(elapsed > 0.0) || !distance.is_finite() {
            return 0.0;
        }
        (distance / elapsed).min(MAX_ROTATION_SPEED) * direction.sign()
    }

    /// Signed, uncapped rad/s between the oldest and newest recorded sample.
    pub fn angular_velocity(&self) -> f64 {
        if self.len < 2 {
            return 0.0;
        }
        let first = 3 - self.len;
        let elapsed = self.times[2] - self.times[first];
        let distance: f64 = self.deltas[first + 1..].iter().sum();
        if !(elapsed > 0.0) || !distance.is_finite() {
            return 0.0;
        }
        distance / elapsed
    }
}

const MOMENTUM_STEP: f64 = PI / 8.0;

/// Stopping distance for a release at `velocity`, pulled below half a turn in
/// eighth-turn steps.
pub fn momentum_distance(velocity: f64) -> f64 {
    let mut distance = velocity.powi(2) / (2.0 * DECELERATION);
    if !distance.is_finite() {
        return 0.0;
    }
    if distance >= PI {
        let steps = ((distance - PI) / MOMENTUM_STEP).floor() + 1.0;
        distance -= steps * MOMENTUM_STEP;
    }
    while distance >= PI {
        distance -= MOMENTUM_STEP;
    }
    distance
}

/// Direction of travel between two `atan2` angles. Jumping across the `±π`
/// seam counts as continuing in the same direction.
pub fn movement_direction(new_angle: f64, old_angle: f64) -> RotationDirection {
    if new_angle < 0.0 && old_angle > 0.0 && new_angle.abs() > FRAC_PI_2 {
        RotationDirection::Clockwise
    } else if new_angle > 0.0 && old_angle < 0.0 && new_angle.abs() > FRAC_PI_2 {
        RotationDirection::CounterClockwise
    } else if new_angle > old_angle {
        RotationDirection::Clockwise
    } else {
        RotationDirection::CounterClockwise
    }
}

pub fn angle_delta(new_angle: f64, old_angle: f64) -> f64 {
    (new_angle.abs() - old_angle.abs()).abs() * movement_direction(new_angle, old_angle).sign()
}

/// Visual rotation for an arc, compressing overshoot past either end into
/// at most [`ELASTIC_LIMIT`].
pub fn dampened(rotation: f64) -> f64 {
    if rotation.is_nan() {
        return 0.0;
    }
    if rotation < 0.0 {
        let progress = (rotation.max(-PI) / PI).abs();
        -(progress.sqrt() * FRAC_PI_2).sin() * ELASTIC_LIMIT
    } else if rotation > TAU {
        let progress = (rotation.min(TAU + PI) - TAU) / PI;
        TAU + (progress.sqrt() * FRAC_PI_2).sin() * ELASTIC_LIMIT
    } else {
        rotation
    }
}

fn in_range(arc: f64) -> bool {
    (0.0..=TAU).contains(&arc)
}

#[derive(Debug, Clone)]
pub struct RotationController {
    state: RotationState,
    arc: f64,
    transform: f64,
    brightness: Brightness,
    samples: GestureSamples,
    last_angle: f64,
    last_direction: RotationDirection,
    twist_origin: f64,
    twist_total: f64,
    last_twist: f64,
    animation: Option<Tween>,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(Brightness::default())
    }
}

impl RotationController {
    pub fn new(brightness: Brightness) -> Self {
        let arc = brightness.to_arc();
        Self {
            state: RotationState::Idle,
            arc,
            transform: arc,
            brightness,
            samples: GestureSamples::default(),
            last_angle: 0.0,
            last_direction: RotationDirection::None,
            twist_origin: arc,
            twist_total: 0.0,
            last_twist: 0.0,
            animation: None,
        }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn arc(&self) -> f64 {
        self.arc
    }

    /// Visual rotation of the wheel in radians, clockwise-positive.
    pub fn transform(&self) -> f64 {
        self.transform
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, RotationState::Animating(_))
    }

    pub fn is_out_of_range(&self) -> bool {
        !in_range(self.arc)
    }

    /// Jumps to `brightness` when idle. Returns whether it was applied.
    pub fn set_brightness(&mut self, brightness: Brightness) -> bool {
        if self.state != RotationState::Idle {
            log::debug!("Ignoring brightness {brightness} while {}", self.state);
            return false;
        }
        self.arc = brightness.to_arc();
        self.transform = self.arc;
        self.brightness = brightness;
        true
    }

    /// Spins to `brightness` over `duration`. Only starts when idle.
    pub fn animate_brightness(
        &mut self,
        brightness: Brightness,
        duration: f64,
        easing: Easing,
        now: f64,
    ) -> bool {
        if self.state != RotationState::Idle {
            log::debug!("Ignoring brightness animation while {}", self.state);
            return false;
        }
        let tween = Tween::eased(self.arc, brightness.to_arc(), now, duration, easing);
        self.start_animation(Motion::Programmatic, tween);
        true
    }

    pub fn should_begin_pan(&self, distance: f64) -> bool {
        distance <= 1.0 && self.state == RotationState::Idle
    }

    pub fn should_begin_rotate(&self, distance_a: f64, distance_b: f64) -> bool {
        distance_a <= 1.0 && distance_b <= 1.0 && self.state == RotationState::Idle
    }

    pub fn pan_began(&mut self, angle: f64) -> bool {
        if !self.begin(RotationState::PanTracking) {
            return false;
        }
        self.last_angle = angle;
        true
    }

    pub fn pan_changed(&mut self, angle: f64, now: f64) {
        if self.state != RotationState::PanTracking {
            return;
        }
        let delta = angle_delta(angle, self.last_angle);
        self.samples.push(delta, now);
        if delta != 0.0 {
            self.last_direction = movement_direction(angle, self.last_angle);
        }
        self.last_angle = angle;
        self.track(self.arc + delta);
    }

    /// Ends (or cancels) a pan at `angle`.
    pub fn pan_ended(&mut self, angle: f64, now: f64) {
        if self.state != RotationState::PanTracking {
            return;
        }
        self.pan_changed(angle, now);
        let velocity = self.samples.radial_speed(self.last_direction);
        self.release(velocity, now);
    }

    pub fn rotate_began(&mut self) -> bool {
        if !self.begin(RotationState::RotateTracking) {
            return false;
        }
        self.twist_origin = self.arc;
        self.twist_total = 0.0;
        self.last_twist = 0.0;
        true
    }

    /// `rotation` is the total twist since the gesture began.
    pub fn rotate_changed(&mut self, rotation: f64, now: f64) {
        if self.state != RotationState::RotateTracking || !rotation.is_finite() {
            return;
        }
        let mut delta = rotation - self.last_twist;
        // recognizers report the twist in (-π, π], unwrap jumps across the seam
        if delta > PI {
            delta -= TAU;
        } else if delta < -PI {
            delta += TAU;
        }
        self.last_twist = rotation;
        self.twist_total += delta;
        self.samples.push(delta, now);
        if delta > 0.0 {
            self.last_direction = RotationDirection::Clockwise;
        } else if delta < 0.0 {
            self.last_direction = RotationDirection::CounterClockwise;
        }
        self.track(self.twist_origin + self.twist_total);
    }

    /// Ends (or cancels) a twist at total `rotation`.
    pub fn rotate_ended(&mut self, rotation: f64, now: f64) {
        if self.state != RotationState::RotateTracking {
            return;
        }
        self.rotate_changed(rotation, now);
        let velocity = self.samples.angular_velocity();
        self.release(velocity, now);
    }

    /// Advances a running animation. Returns whether one is still in flight.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(tween) = self.animation else {
            return false;
        };
        let RotationState::Animating(motion) = self.state else {
            log::debug!("Dropping stale animation in state {}", self.state);
            self.animation = None;
            return false;
        };

        let sample = tween.sample(now);
        match motion {
            Motion::Momentum | Motion::Programmatic => {
                self.arc = sample.value;
                self.transform = sample.value;
                if in_range(self.arc) {
                    self.brightness = Brightness::from_arc(self.arc);
                }
            }
            Motion::SnapBack => self.transform = sample.value,
        }

        if sample.finished {
            self.animation = None;
            self.finish(motion, tween.target(), now);
        }
        self.animation.is_some()
    }

    fn begin(&mut self, state: RotationState) -> bool {
        if self.state != RotationState::Idle {
            log::debug!("Refusing {state}, controller is {}", self.state);
            return false;
        }
        self.samples.reset();
        self.last_direction = RotationDirection::None;
        self.state = state;
        log::debug!("Rotation {state} at arc {:.3}", self.arc);
        true
    }

    fn track(&mut self, arc: f64) {
        self.arc = arc;
        self.transform = dampened(arc);
        if in_range(arc) {
            self.brightness = Brightness::from_arc(arc);
        }
    }

    fn release(&mut self, velocity: f64, now: f64) {
        self.samples.reset();

        if self.is_out_of_range() {
            self.start_snap_back(now);
        } else if velocity.abs() > MIN_SPEED_THRESHOLD {
            self.start_momentum(velocity, now);
        } else {
            self.settle(self.arc);
        }
    }

    fn start_momentum(&mut self, velocity: f64, now: f64) {
        let distance = momentum_distance(velocity);
        let target = (self.arc + distance * velocity.signum()).clamp(0.0, TAU);
        log::debug!("Momentum at {velocity:.3} rad/s towards arc {target:.3}");
        let tween = Tween::eased(self.arc, target, now, MOMENTUM_DURATION, Easing::EaseOut);
        self.start_animation(Motion::Momentum, tween);
    }

    fn start_snap_back(&mut self, now: f64) {
        let target = if self.arc < 0.0 { 0.0 } else { TAU };
        log::debug!("Snapping back from arc {:.3} to {target:.3}", self.arc);
        let tween = Tween::spring(self.transform, target, now, Spring::SNAP_BACK);
        self.start_animation(Motion::SnapBack, tween);
    }

    fn start_animation(&mut self, motion: Motion, tween: Tween) {
        self.state = RotationState::Animating(motion);
        self.animation = Some(tween);
    }

    fn finish(&mut self, motion: Motion, target: f64, now: f64) {
        self.arc = target;
        if motion != Motion::SnapBack && self.is_out_of_range() {
            self.state = RotationState::Idle;
            self.start_snap_back(now);
            return;
        }
        self.settle(target);
    }

    fn settle(&mut self, arc: f64) {
        self.arc = arc;
        self.transform = arc;
        self.brightness = Brightness::from_arc(arc);
        self.state = RotationState::Idle;
        log::debug!("Rotation idle at arc {arc:.3}, brightness {}", self.brightness);
    }
}
