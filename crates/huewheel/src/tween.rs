//! Time-based interpolation driven by the host's frame clock.
//!
//! Times are seconds on a monotonic clock chosen by the host. A [`Tween`] never
//! schedules anything itself; the host samples it every frame and acts on the
//! `finished` flag of the returned [`TweenSample`].

/// Envelope amplitude below which a spring counts as settled.
const SETTLE_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut if t < 0.5 => 4.0 * t * t * t,
            Self::EaseInOut => 1.0 - (-2.0 * t + 2.0).powi(3) / 2.0,
        }
    }
}

/// Damped harmonic oscillator released from rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
}

impl Spring {
    pub const SNAP_BACK: Spring = Spring {
        damping: 20.0,
        stiffness: 1000.0,
        mass: 1.0,
    };

    fn is_valid(&self) -> bool {
        self.stiffness > 0.0 && self.mass > 0.0 && self.damping >= 0.0
    }

    fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Fraction of the way from start to target after `t` seconds. Starts at
    /// `0`, converges to `1`, and may overshoot when underdamped.
    pub fn progress(&self, t: f64) -> f64 {
        if !self.is_valid() {
            return 1.0;
        }
        let t = t.max(0.0);
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        if (zeta - 1.0).abs() < 1e-9 {
            1.0 - (-w0 * t).exp() * (1.0 + w0 * t)
        } else if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * w0 * t).exp();
            1.0 - envelope * ((wd * t).cos() + (zeta * w0 / wd) * (wd * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - root);
            let r2 = -w0 * (zeta + root);
            1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        }
    }

    /// Time after which the oscillation is visually at rest.
    pub fn settling_duration(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();
        let decay = if zeta < 1.0 {
            zeta * w0
        } else {
            w0 * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        let duration = -SETTLE_EPSILON.ln() / decay;
        if duration.is_finite() { duration } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Eased(Easing),
    Spring(Spring),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    pub value: f64,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
    curve: Curve,
}

impl Tween {
    pub fn eased(from: f64, to: f64, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            curve: Curve::Eased(easing),
        }
    }

    pub fn spring(from: f64, to: f64, start: f64, spring: Spring) -> Self {
        Self {
            from,
            to,
            start,
            duration: spring.settling_duration(),
            curve: Curve::Spring(spring),
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn sample(&self, now: f64) -> TweenSample {
        // compared in absolute time, `(start + d) - start` can round below `d`
        if !(self.duration > 0.0) || now >= self.start + self.duration {
            return TweenSample {
                value: self.to,
                finished: true,
            };
        }
        let elapsed = (now - self.start).max(0.0);
        let progress = match self.curve {
            Curve::Eased(easing) => easing.apply(elapsed / self.duration),
            Curve::Spring(spring) => spring.progress(elapsed),
        };
        TweenSample {
            value: self.from + (self.to - self.from) * progress,
            finished: false,
        }
    }
}
