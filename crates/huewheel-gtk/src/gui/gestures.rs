use crate::gui::animator::{Animator, now};
use gtk::prelude::*;
use gtk4 as gtk;
use huewheel::{ColorWheel, Point};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Pointer travel before a drag turns into a pan. Shorter presses stay taps.
const PAN_THRESHOLD: f64 = 8.0;

type Wheel = Rc<RefCell<ColorWheel>>;

pub fn attach(area: &gtk::DrawingArea, wheel: &Wheel, animator: &Animator, hover: bool) {
    area.add_controller(tap_controller(wheel));
    area.add_controller(pan_controller(wheel, animator));
    area.add_controller(rotate_controller(wheel, animator));
    if hover {
        area.add_controller(hover_controller(wheel));
    }
}

fn tap_controller(wheel: &Wheel) -> gtk::GestureClick {
    let gesture = gtk::GestureClick::new();
    let wheel = wheel.clone();
    gesture.connect_released(move |_, _, x, y| {
        wheel.borrow_mut().tap(Point::new(x, y));
    });
    gesture
}

fn pan_controller(wheel: &Wheel, animator: &Animator) -> gtk::GestureDrag {
    let gesture = gtk::GestureDrag::new();
    // last pointer position while a pan is being tracked
    let tracking: Rc<Cell<Option<Point>>> = Rc::default();

    {
        let (wheel, tracking) = (wheel.clone(), tracking.clone());
        gesture.connect_drag_update(move |gesture, dx, dy| {
            let Some((x, y)) = gesture.start_point() else {
                return;
            };
            let start = Point::new(x, y);
            let point = Point::new(x + dx, y + dy);
            let mut wheel = wheel.borrow_mut();

            if tracking.get().is_none() {
                if dx.hypot(dy) < PAN_THRESHOLD {
                    return;
                }
                if !wheel.should_begin_pan(start) || !wheel.pan_began(start) {
                    gesture.set_state(gtk::EventSequenceState::Denied);
                    return;
                }
                gesture.set_state(gtk::EventSequenceState::Claimed);
            }

            tracking.set(Some(point));
            wheel.pan_changed(point, now());
        });
    }

    {
        let (wheel, tracking, animator) = (wheel.clone(), tracking.clone(), animator.clone());
        gesture.connect_drag_end(move |gesture, dx, dy| {
            if tracking.take().is_none() {
                return;
            }
            let point = gesture
                .start_point()
                .map(|(x, y)| Point::new(x + dx, y + dy));
            if let Some(point) = point {
                wheel.borrow_mut().pan_ended(point, now());
                animator.kick();
            }
        });
    }

    {
        let (wheel, animator) = (wheel.clone(), animator.clone());
        gesture.connect_cancel(move |_, _| {
            if let Some(point) = tracking.take() {
                wheel.borrow_mut().pan_ended(point, now());
                animator.kick();
            }
        });
    }

    gesture
}

fn rotate_controller(wheel: &Wheel, animator: &Animator) -> gtk::GestureRotate {
    let gesture = gtk::GestureRotate::new();
    // accumulated twist while tracking; `angle_delta` is reset by the time `end` fires
    let twist: Rc<Cell<Option<f64>>> = Rc::default();

    {
        let (wheel, twist) = (wheel.clone(), twist.clone());
        gesture.connect_begin(move |gesture, _| {
            let points: Vec<Point> = gesture
                .sequences()
                .iter()
                .filter_map(|sequence| gesture.point(Some(sequence)))
                .map(|(x, y)| Point::new(x, y))
                .collect();

            let mut wheel = wheel.borrow_mut();
            let accepted = match points.as_slice() {
                [a, b, ..] => wheel.should_begin_rotate(*a, *b) && wheel.rotate_began(),
                _ => false,
            };

            if accepted {
                twist.set(Some(0.0));
            } else {
                gesture.set_state(gtk::EventSequenceState::Denied);
            }
        });
    }

    {
        let (wheel, twist) = (wheel.clone(), twist.clone());
        gesture.connect_angle_changed(move |_, _, delta| {
            if twist.get().is_some() {
                twist.set(Some(delta));
                wheel.borrow_mut().rotate_changed(delta, now());
            }
        });
    }

    {
        let (wheel, twist, animator) = (wheel.clone(), twist.clone(), animator.clone());
        gesture.connect_end(move |_, _| {
            if let Some(total) = twist.take() {
                wheel.borrow_mut().rotate_ended(total, now());
                animator.kick();
            }
        });
    }

    {
        let (wheel, animator) = (wheel.clone(), animator.clone());
        gesture.connect_cancel(move |_, _| {
            if let Some(total) = twist.take() {
                wheel.borrow_mut().rotate_ended(total, now());
                animator.kick();
            }
        });
    }

    gesture
}

fn hover_controller(wheel: &Wheel) -> gtk::EventControllerMotion {
    let controller = gtk::EventControllerMotion::new();
    {
        let wheel = wheel.clone();
        controller.connect_motion(move |_, x, y| {
            wheel.borrow_mut().hover(Point::new(x, y));
        });
    }
    {
        let wheel = wheel.clone();
        controller.connect_leave(move |_| {
            wheel.borrow_mut().clear_hover();
        });
    }
    controller
}
