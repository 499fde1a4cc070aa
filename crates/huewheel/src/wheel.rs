use crate::color::{Brightness, Hsb};
use crate::config::{WheelConfig, WheelVariant};
use crate::geometry::{Point, Size};
use crate::render::{Canvas, WheelRenderer};
use crate::rotation::RotationController;
use crate::selection::{SelectionResolver, normalized_distance};
use crate::tween::Easing;

macro_rules! renderer_setters {
    ($($setter:ident),* $(,)?) => {
        $(
            pub fn $setter(&mut self, value: f64) {
                self.renderer.$setter(value);
            }
        )*
    };
}

/// Color wheel widget: a renderer and tap resolver, plus a rotation
/// controller for the [`WheelVariant::Rotating`] variant.
///
/// All points passed in are in the host's local coordinates, where the
/// wheel is centered in `size`.
#[derive(Debug)]
pub struct ColorWheel {
    renderer: WheelRenderer,
    resolver: SelectionResolver,
    rotation: Option<RotationController>,
    size: Size,
}

impl ColorWheel {
    pub fn new(config: WheelConfig, variant: WheelVariant) -> Self {
        let renderer = WheelRenderer::new(config);
        let rotation = variant
            .rotates()
            .then(|| RotationController::new(renderer.brightness()));
        let mut wheel = Self {
            renderer,
            resolver: SelectionResolver::default(),
            rotation,
            size: Size::default(),
        };
        wheel.sync_rotation();
        wheel
    }

    pub fn variant(&self) -> WheelVariant {
        if self.rotation.is_some() {
            WheelVariant::Rotating
        } else {
            WheelVariant::Static
        }
    }

    pub fn renderer(&self) -> &WheelRenderer {
        &self.renderer
    }

    pub fn rotation(&self) -> Option<&RotationController> {
        self.rotation.as_ref()
    }

    pub fn config(&self) -> &WheelConfig {
        self.renderer.config()
    }

    pub fn set_config(&mut self, config: WheelConfig) {
        self.renderer.set_config(config);
    }

    renderer_setters!(
        set_padding,
        set_center_radius,
        set_min_dot_radius,
        set_max_dot_radius,
        set_inner_padding,
        set_shift_degree,
        set_density,
    );

    pub fn set_highlight_color(&mut self, color: Hsb) {
        self.renderer.set_highlight_color(color);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn center(&self) -> Point {
        self.size.center()
    }

    /// Outer radius of the wheel in points.
    pub fn radius(&self) -> f64 {
        self.renderer.outer_radius(self.size)
    }

    pub fn brightness(&self) -> Brightness {
        self.renderer.brightness()
    }

    /// On the rotating variant this also spins the wheel to the matching arc,
    /// unless a gesture or animation currently owns the rotation.
    pub fn set_brightness(&mut self, brightness: Brightness) {
        if let Some(rotation) = self.rotation.as_mut() {
            if !rotation.set_brightness(brightness) {
                return;
            }
        }
        self.renderer.set_brightness(brightness);
        self.sync_rotation();
    }

    pub fn animate_brightness(
        &mut self,
        brightness: Brightness,
        duration: f64,
        easing: Easing,
        now: f64,
    ) {
        match self.rotation.as_mut() {
            Some(rotation) => {
                if !rotation.animate_brightness(brightness, duration, easing, now) {
                    log::info!("Brightness animation to {brightness} dropped, wheel is busy");
                }
            }
            None => self
                .renderer
                .animate_brightness(brightness, duration, easing, now),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.renderer.is_animating()
            || self
                .rotation
                .as_ref()
                .is_some_and(RotationController::is_animating)
    }

    /// Current visual rotation in radians, clockwise-positive.
    pub fn rotation_angle(&self) -> f64 {
        self.renderer.rotation()
    }

    pub fn on_select(&mut self, listener: impl FnMut(Hsb) + 'static) {
        self.resolver.set_listener(listener);
    }

    /// Called at most once between two renders, on the first change that needs a repaint.
    pub fn on_redraw(&mut self, hook: impl FnMut() + 'static) {
        self.renderer.set_redraw_hook(hook);
    }

    pub fn needs_redraw(&self) -> bool {
        self.renderer.needs_redraw()
    }

    /// Maps a host point onto the unrotated wheel.
    pub fn to_wheel_space(&self, point: Point) -> Point {
        point.rotated_about(self.center(), -self.rotation_angle())
    }

    pub fn normalized_distance(&self, point: Point) -> f64 {
        normalized_distance(point, self.center(), self.radius())
    }

    /// Resolves a tap and notifies the listener. Taps outside the wheel are ignored.
    pub fn tap(&mut self, point: Point) -> Option<Hsb> {
        let local = self.to_wheel_space(point);
        let color = self.resolver.tap(
            local,
            self.center(),
            self.radius(),
            self.renderer.config(),
            self.renderer.brightness().value(),
        )?;
        self.renderer.set_highlight(Some(local));
        Some(color)
    }

    pub fn hover(&mut self, point: Point) {
        let local = self.to_wheel_space(point);
        if self.normalized_distance(local) <= 1.0 {
            self.renderer.set_highlight(Some(local));
        } else {
            self.clear_hover();
        }
    }

    pub fn clear_hover(&mut self) {
        self.renderer.set_highlight(None);
    }

    pub fn should_begin_pan(&self, point: Point) -> bool {
        let distance = self.normalized_distance(point);
        self.rotation
            .as_ref()
            .is_some_and(|rotation| rotation.should_begin_pan(distance))
    }

    pub fn should_begin_rotate(&self, a: Point, b: Point) -> bool {
        let (distance_a, distance_b) = (self.normalized_distance(a), self.normalized_distance(b));
        self.rotation
            .as_ref()
            .is_some_and(|rotation| rotation.should_begin_rotate(distance_a, distance_b))
    }

    pub fn pan_began(&mut self, point: Point) -> bool {
        let angle = point.angle_from(self.center());
        self.rotation
            .as_mut()
            .is_some_and(|rotation| rotation.pan_began(angle))
    }

    pub fn pan_changed(&mut self, point: Point, now: f64) {
        let angle = point.angle_from(self.center());
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.pan_changed(angle, now);
        }
        self.sync_rotation();
    }

    /// Ends or cancels a pan; both resolve the same way.
    pub fn pan_ended(&mut self, point: Point, now: f64) {
        let angle = point.angle_from(self.center());
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.pan_ended(angle, now);
        }
        self.sync_rotation();
    }

    pub fn rotate_began(&mut self) -> bool {
        self.rotation
            .as_mut()
            .is_some_and(RotationController::rotate_began)
    }

    pub fn rotate_changed(&mut self, rotation: f64, now: f64) {
        if let Some(controller) = self.rotation.as_mut() {
            controller.rotate_changed(rotation, now);
        }
        self.sync_rotation();
    }

    pub fn rotate_ended(&mut self, rotation: f64, now: f64) {
        if let Some(controller) = self.rotation.as_mut() {
            controller.rotate_ended(rotation, now);
        }
        self.sync_rotation();
    }

    /// Advances running animations to `now`. Returns whether any is still in flight.
    pub fn tick(&mut self, now: f64) -> bool {
        let rendering = self.renderer.tick(now);
        let rotating = self
            .rotation
            .as_mut()
            .is_some_and(|rotation| rotation.tick(now));
        self.sync_rotation();
        rendering || rotating
    }

    pub fn render<C: Canvas>(&mut self, canvas: &mut C) -> Result<(), C::Error> {
        self.renderer.render(canvas, self.size)
    }

    fn sync_rotation(&mut self) {
        let Some(rotation) = self.rotation.as_ref() else {
            return;
        };
        let (transform, brightness) = (rotation.transform(), rotation.brightness());
        self.renderer.set_rotation(transform);
        if brightness != self.renderer.brightness() {
            self.renderer.set_brightness(brightness);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::Recorder;
    use crate::rotation::{Motion, RotationState};
    use std::cell::{Cell, RefCell};
    use std::f64::consts::{PI, TAU};
    use std::rc::Rc;

    fn wheel(variant: WheelVariant) -> ColorWheel {
        let mut wheel = ColorWheel::new(WheelConfig::default(), variant);
        wheel.set_size(Size::new(300.0, 300.0));
        wheel
    }

    fn on_circle(wheel: &ColorWheel, angle: f64, distance: f64) -> Point {
        let center = wheel.center();
        let reach = wheel.radius() * distance;
        Point::new(center.x + reach * angle.cos(), center.y + reach * angle.sin())
    }

    #[test]
    fn test_radius_follows_size_and_padding() {
        let mut wheel = wheel(WheelVariant::Static);
        assert_eq!(wheel.radius(), 138.0);
        wheel.set_size(Size::new(400.0, 200.0));
        assert_eq!(wheel.radius(), 88.0);
    }

    #[test]
    fn test_tap_reports_color_without_changing_brightness() {
        let selected = Rc::new(RefCell::new(Vec::new()));
        let mut wheel = wheel(WheelVariant::Static);
        let sink = selected.clone();
        wheel.on_select(move |color| sink.borrow_mut().push(color));
        wheel.set_brightness(Brightness::new(0.6));

        let color = wheel.tap(on_circle(&wheel, 0.0, 0.5)).unwrap();
        assert_eq!(color.brightness, 0.6);
        assert_eq!(wheel.brightness().value(), 0.6);
        assert!(wheel.tap(Point::new(1.0, 1.0)).is_none());
        assert_eq!(selected.borrow().len(), 1);
        assert!(wheel.renderer().highlight().is_some());
    }

    #[test]
    fn test_static_variant_refuses_rotation_gestures() {
        let mut wheel = wheel(WheelVariant::Static);
        let point = on_circle(&wheel, 0.0, 0.5);
        assert!(!wheel.should_begin_pan(point));
        assert!(!wheel.should_begin_rotate(point, point));
        assert!(!wheel.pan_began(point));
        assert!(!wheel.rotate_began());
        assert_eq!(wheel.variant(), WheelVariant::Static);
    }

    #[test]
    fn test_pan_drives_brightness_and_rotation() {
        let mut wheel = wheel(WheelVariant::Rotating);
        wheel.set_brightness(Brightness::MIN);
        assert_eq!(wheel.rotation_angle(), 0.0);

        let start = on_circle(&wheel, 0.0, 0.8);
        assert!(wheel.should_begin_pan(start));
        assert!(wheel.pan_began(start));
        wheel.pan_changed(on_circle(&wheel, PI / 2.0, 0.8), 1.0);
        wheel.pan_changed(on_circle(&wheel, PI, 0.8), 2.0);

        assert!((wheel.brightness().value() - 0.5).abs() < 1e-9);
        assert!((wheel.rotation_angle() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_overshoot_snaps_back_through_ticks() {
        let mut wheel = wheel(WheelVariant::Rotating);
        wheel.set_brightness(Brightness::MIN);

        let start = on_circle(&wheel, 0.3, 0.8);
        assert!(wheel.pan_began(start));
        wheel.pan_changed(on_circle(&wheel, 0.0, 0.8), 1.0);
        assert!(wheel.rotation_angle() < 0.0);
        wheel.pan_ended(on_circle(&wheel, 0.0, 0.8), 1.1);
        assert!(wheel.is_animating());

        // neither gesture may start while the spring runs
        let inside = on_circle(&wheel, 1.0, 0.5);
        assert!(!wheel.should_begin_pan(inside));
        assert!(!wheel.should_begin_rotate(inside, inside));

        let mut now = 1.1;
        while wheel.tick(now) {
            now += 1.0 / 60.0;
        }
        assert_eq!(wheel.rotation_angle(), 0.0);
        assert_eq!(wheel.brightness().value(), 0.0);
        assert_eq!(
            wheel.rotation().map(RotationController::state),
            Some(RotationState::Idle)
        );
    }

    #[test]
    fn test_tap_on_rotated_wheel_is_unrotated() {
        let mut rotating = wheel(WheelVariant::Rotating);
        rotating.set_brightness(Brightness::new(0.25));
        assert!((rotating.rotation_angle() - TAU / 4.0).abs() < 1e-12);

        let mut plain = wheel(WheelVariant::Static);
        plain.set_brightness(Brightness::new(0.25));

        // what sits at angle 0 on the unrotated wheel now shows a quarter turn further
        let unrotated = plain.tap(on_circle(&plain, 0.0, 0.5)).unwrap();
        let rotated = rotating.tap(on_circle(&rotating, PI / 2.0, 0.5)).unwrap();
        assert!((unrotated.hue - rotated.hue).abs() < 1e-9);
        assert!((unrotated.saturation - rotated.saturation).abs() < 1e-9);
    }

    #[test]
    fn test_twist_then_programmatic_animation() {
        let mut wheel = wheel(WheelVariant::Rotating);
        wheel.set_brightness(Brightness::new(0.5));
        assert!(wheel.rotate_began());
        wheel.rotate_changed(-PI / 2.0, 1.0);
        wheel.rotate_ended(-PI / 2.0, 10.0);
        assert!((wheel.brightness().value() - 0.25).abs() < 1e-9);

        wheel.animate_brightness(Brightness::MAX, 0.5, Easing::EaseInOut, 20.0);
        assert_eq!(
            wheel.rotation().map(RotationController::state),
            Some(RotationState::Animating(Motion::Programmatic))
        );
        assert!(!wheel.tick(20.5));
        assert_eq!(wheel.brightness(), Brightness::MAX);
        assert_eq!(wheel.rotation_angle(), TAU);
    }

    #[test]
    fn test_gesture_frames_request_one_redraw_each() {
        let requests = Rc::new(Cell::new(0));
        let mut wheel = wheel(WheelVariant::Rotating);
        let counter = requests.clone();
        wheel.on_redraw(move || counter.set(counter.get() + 1));
        wheel.render(&mut Recorder::default()).unwrap();

        wheel.pan_began(on_circle(&wheel, 0.0, 0.5));
        wheel.pan_changed(on_circle(&wheel, -0.1, 0.5), 1.0);
        wheel.pan_changed(on_circle(&wheel, -0.2, 0.5), 1.1);
        wheel.hover(on_circle(&wheel, 1.0, 0.4));
        assert_eq!(requests.get(), 1);

        wheel.render(&mut Recorder::default()).unwrap();
        wheel.pan_changed(on_circle(&wheel, -0.3, 0.5), 1.2);
        assert_eq!(requests.get(), 2);
    }

    #[test]
    fn test_rotating_brightness_keeps_arc_in_sync() {
        let mut wheel = wheel(WheelVariant::Rotating);
        wheel.set_brightness(Brightness::new(0.2));

        let arc = wheel.rotation().map(RotationController::arc).unwrap();
        assert!((arc - 0.2 * TAU).abs() < 1e-12);
        assert!((wheel.rotation_angle() - 0.2 * TAU).abs() < 1e-12);

        let color = wheel.tap(on_circle(&wheel, 0.0, 0.5)).unwrap();
        assert!((color.brightness - arc / TAU).abs() < 1e-12);
    }

    #[test]
    fn test_busy_wheel_ignores_brightness_requests() {
        let mut wheel = wheel(WheelVariant::Rotating);
        wheel.pan_began(on_circle(&wheel, 0.0, 0.5));
        wheel.set_brightness(Brightness::new(0.2));
        wheel.animate_brightness(Brightness::new(0.4), 0.3, Easing::Linear, 1.0);

        assert_eq!(wheel.brightness(), Brightness::MAX);
        assert_eq!(
            wheel.rotation().map(RotationController::state),
            Some(RotationState::PanTracking)
        );
    }

    #[test]
    fn test_config_setters_relayout() {
        let mut wheel = wheel(WheelVariant::Static);
        wheel.render(&mut Recorder::default()).unwrap();
        let passes = wheel.renderer().layout_passes();

        wheel.set_padding(20.0);
        wheel.set_density(0.5);
        assert_eq!(wheel.config().padding, 20.0);
        assert_eq!(wheel.config().density, 0.5);
        assert_eq!(wheel.radius(), 130.0);

        wheel.render(&mut Recorder::default()).unwrap();
        assert_eq!(wheel.renderer().layout_passes(), passes + 1);
    }

    #[test]
    fn test_hover_outside_clears_highlight() {
        let mut wheel = wheel(WheelVariant::Static);
        wheel.hover(on_circle(&wheel, 0.5, 0.5));
        assert!(wheel.renderer().highlight().is_some());
        wheel.hover(Point::new(0.0, 0.0));
        assert!(wheel.renderer().highlight().is_none());
    }
}
