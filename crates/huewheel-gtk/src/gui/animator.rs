use gtk::prelude::*;
use gtk4 as gtk;
use huewheel::ColorWheel;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Seconds on the same monotonic clock the frame clock uses.
pub fn now() -> f64 {
    glib::monotonic_time() as f64 / 1_000_000.0
}

fn frame(wheel: &mut ColorWheel, now: f64) -> glib::ControlFlow {
    if wheel.tick(now) {
        glib::ControlFlow::Continue
    } else {
        glib::ControlFlow::Break
    }
}

/// Drives wheel animations from the frame clock. The tick callback only
/// exists while an animation is in flight.
#[derive(Clone)]
pub struct Animator {
    area: glib::WeakRef<gtk::DrawingArea>,
    wheel: Rc<RefCell<ColorWheel>>,
    running: Rc<Cell<bool>>,
}

impl Animator {
    pub fn new(area: &gtk::DrawingArea, wheel: &Rc<RefCell<ColorWheel>>) -> Self {
        Self {
            area: area.downgrade(),
            wheel: wheel.clone(),
            running: Rc::default(),
        }
    }

    /// Starts ticking if the wheel has something to animate. Must not be
    /// called while the wheel is borrowed.
    pub fn kick(&self) {
        if self.running.get() || !self.wheel.borrow().is_animating() {
            return;
        }
        let Some(area) = self.area.upgrade() else {
            return;
        };

        self.running.set(true);
        let (wheel, running) = (self.wheel.clone(), self.running.clone());
        area.add_tick_callback(move |_, _| {
            let flow = frame(&mut wheel.borrow_mut(), now());
            if flow == glib::ControlFlow::Break {
                running.set(false);
            }
            flow
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huewheel::{Brightness, Easing, WheelConfig, WheelVariant};

    #[test]
    fn test_frames_stop_once_settled() {
        let mut wheel = ColorWheel::new(WheelConfig::default(), WheelVariant::Static);
        assert_eq!(frame(&mut wheel, 0.0), glib::ControlFlow::Break);

        wheel.animate_brightness(Brightness::new(0.5), 1.0, Easing::Linear, 0.0);
        assert_eq!(frame(&mut wheel, 0.5), glib::ControlFlow::Continue);
        assert_eq!(frame(&mut wheel, 1.0), glib::ControlFlow::Break);
        assert_eq!(wheel.brightness(), Brightness::new(0.5));
        assert!(!wheel.is_animating());
    }

    #[test]
    fn test_frames_follow_rotating_brightness_fade() {
        let mut wheel = ColorWheel::new(WheelConfig::default(), WheelVariant::Rotating);
        wheel.set_brightness(Brightness::new(0.25));
        wheel.animate_brightness(Brightness::new(0.75), 0.3, Easing::EaseInOut, 2.0);
        assert!(wheel.is_animating());

        let mut t = 2.0;
        while frame(&mut wheel, t) == glib::ControlFlow::Continue {
            t += 1.0 / 60.0;
        }
        assert!(t >= 2.3);
        assert!((wheel.brightness().value() - 0.75).abs() < 1e-9);
    }
}
