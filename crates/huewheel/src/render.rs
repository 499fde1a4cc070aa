use crate::color::{Brightness, Hsb};
use crate::config::WheelConfig;
use crate::geometry::{Mapper, Point, Size, normalize_angle};
use crate::layout::{self, Ring};
use crate::selection::normalized_distance;
use crate::tween::{Easing, Tween};
use std::f64::consts::TAU;

/// Immediate-mode surface the wheel paints onto.
pub trait Canvas {
    type Error;

    /// Fills a circle and strokes its outline with the same color.
    fn fill_stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Hsb,
    ) -> Result<(), Self::Error>;

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Hsb,
    ) -> Result<(), Self::Error>;
}

/// Collapses any number of changes between two paints into one redraw request.
pub struct Invalidation {
    dirty: bool,
    hook: Option<Box<dyn FnMut()>>,
}

impl Default for Invalidation {
    fn default() -> Self {
        // nothing has been painted yet
        Self {
            dirty: true,
            hook: None,
        }
    }
}

impl std::fmt::Debug for Invalidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invalidation")
            .field("dirty", &self.dirty)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl Invalidation {
    pub fn set_hook(&mut self, hook: impl FnMut() + 'static) {
        self.hook = Some(Box::new(hook));
    }

    pub fn invalidate(&mut self) {
        if self.dirty {
            return;
        }
        self.dirty = true;
        if let Some(hook) = self.hook.as_mut() {
            hook();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        self.dirty = false;
    }
}

#[derive(Debug)]
struct LayoutCache {
    outer_radius: f64,
    rings: Vec<Ring>,
}

macro_rules! config_setter {
    ($(#[$meta:meta])* $setter:ident, $field:ident) => {
        $(#[$meta])*
        pub fn $setter(&mut self, value: f64) {
            self.set_config(WheelConfig {
                $field: value,
                ..self.config
            });
        }
    };
}

/// Owns the visual parameters and paints the wheel.
///
/// Structural parameters invalidate the cached ring layout; brightness,
/// rotation and the highlight only recolor or move already laid out dots.
#[derive(Debug)]
pub struct WheelRenderer {
    config: WheelConfig,
    brightness: Brightness,
    brightness_tween: Option<Tween>,
    rotation: f64,
    highlight: Option<Point>,
    highlight_color: Hsb,
    cache: Option<LayoutCache>,
    layout_passes: u64,
    invalidation: Invalidation,
}

impl Default for WheelRenderer {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

impl WheelRenderer {
    pub fn new(config: WheelConfig) -> Self {
        Self {
            config: config.sanitized(),
            brightness: Brightness::default(),
            brightness_tween: None,
            rotation: 0.0,
            highlight: None,
            highlight_color: Hsb::new(0.0, 0.0, 1.0),
            cache: None,
            layout_passes: 0,
            invalidation: Invalidation::default(),
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: WheelConfig) {
        let config = config.sanitized();
        if config == self.config {
            return;
        }
        self.config = config;
        self.cache = None;
        log::trace!("Wheel config changed, layout invalidated");
        self.invalidation.invalidate();
    }

    config_setter!(set_padding, padding);
    config_setter!(set_center_radius, center_radius);
    config_setter!(set_min_dot_radius, min_dot_radius);
    config_setter!(set_max_dot_radius, max_dot_radius);
    config_setter!(
        /// Spacing between rings.
        set_inner_padding,
        inner_padding
    );
    config_setter!(set_shift_degree, shift_degree);
    config_setter!(set_density, density);

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Sets brightness immediately, cancelling any brightness animation.
    pub fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness_tween = None;
        self.apply_brightness(brightness);
    }

    pub fn animate_brightness(
        &mut self,
        brightness: Brightness,
        duration: f64,
        easing: Easing,
        now: f64,
    ) {
        self.brightness_tween = Some(Tween::eased(
            self.brightness.value(),
            brightness.value(),
            now,
            duration,
            easing,
        ));
    }

    pub fn is_animating(&self) -> bool {
        self.brightness_tween.is_some()
    }

    /// Advances the brightness animation. Returns whether it is still running.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(tween) = self.brightness_tween else {
            return false;
        };
        let sample = tween.sample(now);
        self.apply_brightness(Brightness::new(sample.value));
        if sample.finished {
            self.brightness_tween = None;
        }
        !sample.finished
    }

    fn apply_brightness(&mut self, brightness: Brightness) {
        if brightness != self.brightness {
            self.brightness = brightness;
            self.invalidation.invalidate();
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Visual rotation applied around the wheel center, clockwise-positive.
    pub fn set_rotation(&mut self, radians: f64) {
        let radians = if radians.is_finite() { radians } else { 0.0 };
        if radians != self.rotation {
            self.rotation = radians;
            self.invalidation.invalidate();
        }
    }

    pub fn highlight(&self) -> Option<Point> {
        self.highlight
    }

    /// Marks the last interaction point, in unrotated wheel coordinates.
    pub fn set_highlight(&mut self, point: Option<Point>) {
        if point != self.highlight {
            self.highlight = point;
            self.invalidation.invalidate();
        }
    }

    pub fn set_highlight_color(&mut self, color: Hsb) {
        if color != self.highlight_color {
            self.highlight_color = color;
            self.invalidation.invalidate();
        }
    }

    pub fn set_redraw_hook(&mut self, hook: impl FnMut() + 'static) {
        self.invalidation.set_hook(hook);
    }

    pub fn needs_redraw(&self) -> bool {
        self.invalidation.is_dirty()
    }

    /// Number of times the ring layout has been recomputed.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    pub fn outer_radius(&self, size: Size) -> f64 {
        size.min_side() / 2.0 - self.config.padding
    }

    pub fn rings(&mut self, outer_radius: f64) -> &[Ring] {
        let stale = self
            .cache
            .as_ref()
            .is_none_or(|cache| cache.outer_radius != outer_radius);
        if stale {
            self.layout_passes += 1;
            self.cache = Some(LayoutCache {
                outer_radius,
                rings: layout::layout(outer_radius, &self.config),
            });
        }
        self.cache
            .as_ref()
            .map(|cache| cache.rings.as_slice())
            .unwrap_or_default()
    }

    pub fn render<C: Canvas>(&mut self, canvas: &mut C, size: Size) -> Result<(), C::Error> {
        let outer_radius = self.outer_radius(size);
        let center = size.center();
        self.rings(outer_radius);

        let rings = self
            .cache
            .as_ref()
            .map(|cache| cache.rings.as_slice())
            .unwrap_or_default();
        let mapper = Mapper::new(&self.config);

        for dot in layout::dots(rings, center, outer_radius, mapper, self.brightness.value()) {
            let position = dot.center.rotated_about(center, self.rotation);
            canvas.fill_stroke_circle(position, dot.radius, dot.radius, dot.color)?;
        }

        if let Some(point) = self.highlight {
            self.draw_highlight(canvas, point, center, outer_radius)?;
        }

        self.invalidation.clear();
        Ok(())
    }

    fn draw_highlight<C: Canvas>(
        &self,
        canvas: &mut C,
        point: Point,
        center: Point,
        outer_radius: f64,
    ) -> Result<(), C::Error> {
        let distance = normalized_distance(point, center, outer_radius);
        if !(distance <= 1.0) {
            return Ok(());
        }
        let mapper = Mapper::new(&self.config);
        let angle = normalize_angle(TAU - normalize_angle(point.angle_from(center)));
        let radius = mapper.dot_radius(distance);
        let color = mapper.color_at(angle, distance, self.brightness.value());
        let position = mapper
            .unshifted_position(center, outer_radius, angle, distance)
            .rotated_about(center, self.rotation);

        canvas.fill_stroke_circle(position, radius, radius, color)?;
        canvas.stroke_circle(
            position,
            radius * 1.5,
            (radius / 2.0).max(1.0),
            self.highlight_color,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub(crate) enum Stroke {
        Filled,
        Outline,
    }

    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub calls: Vec<(Stroke, Point, f64, f64, Hsb)>,
    }

    impl Canvas for Recorder {
        type Error = std::convert::Infallible;

        fn fill_stroke_circle(
            &mut self,
            center: Point,
            radius: f64,
            line_width: f64,
            color: Hsb,
        ) -> Result<(), Self::Error> {
            self.calls
                .push((Stroke::Filled, center, radius, line_width, color));
            Ok(())
        }

        fn stroke_circle(
            &mut self,
            center: Point,
            radius: f64,
            line_width: f64,
            color: Hsb,
        ) -> Result<(), Self::Error> {
            self.calls
                .push((Stroke::Outline, center, radius, line_width, color));
            Ok(())
        }
    }

    const SIZE: Size = Size {
        width: 300.0,
        height: 300.0,
    };

    fn counting_renderer() -> (WheelRenderer, Rc<Cell<u32>>) {
        let requests = Rc::new(Cell::new(0));
        let mut renderer = WheelRenderer::default();
        let counter = requests.clone();
        renderer.set_redraw_hook(move || counter.set(counter.get() + 1));
        (renderer, requests)
    }

    #[test]
    fn test_render_paints_every_dot_as_soft_blob() {
        let mut renderer = WheelRenderer::default();
        let mut canvas = Recorder::default();
        renderer.render(&mut canvas, SIZE).unwrap();

        let outer_radius = renderer.outer_radius(SIZE);
        assert_eq!(outer_radius, 138.0);
        let expected: usize = renderer.rings(outer_radius).iter().map(Ring::len).sum();
        assert_eq!(canvas.calls.len(), expected);
        assert!(canvas.calls.iter().all(|(stroke, _, radius, width, _)| {
            *stroke == Stroke::Filled && radius == width
        }));

        let (_, center, radius, _, color) = canvas.calls.last().unwrap();
        assert_eq!(*center, SIZE.center());
        assert_eq!(*radius, 4.0);
        assert_eq!(color.saturation, 0.0);
    }

    #[test]
    fn test_mutations_collapse_into_one_redraw() {
        let (mut renderer, requests) = counting_renderer();
        renderer.render(&mut Recorder::default(), SIZE).unwrap();
        assert!(!renderer.needs_redraw());

        renderer.set_padding(13.0);
        renderer.set_density(1.0);
        renderer.set_brightness(Brightness::new(0.3));
        renderer.set_shift_degree(0.0);
        assert_eq!(requests.get(), 1);
        assert!(renderer.needs_redraw());

        renderer.render(&mut Recorder::default(), SIZE).unwrap();
        renderer.set_center_radius(5.0);
        assert_eq!(requests.get(), 2);
    }

    #[test]
    fn test_unchanged_value_does_not_request_redraw() {
        let (mut renderer, requests) = counting_renderer();
        renderer.render(&mut Recorder::default(), SIZE).unwrap();
        renderer.set_padding(12.0);
        renderer.set_brightness(Brightness::MAX);
        assert_eq!(requests.get(), 0);
    }

    #[test]
    fn test_brightness_does_not_relayout() {
        let mut renderer = WheelRenderer::default();
        renderer.render(&mut Recorder::default(), SIZE).unwrap();
        assert_eq!(renderer.layout_passes(), 1);

        renderer.animate_brightness(Brightness::new(0.2), 1.0, Easing::EaseOut, 0.0);
        for frame in 1..=60 {
            renderer.tick(f64::from(frame) / 60.0);
            renderer.render(&mut Recorder::default(), SIZE).unwrap();
        }
        assert_eq!(renderer.layout_passes(), 1);
        assert_eq!(renderer.brightness(), Brightness::new(0.2));
        assert!(!renderer.is_animating());

        renderer.set_max_dot_radius(8.0);
        renderer.render(&mut Recorder::default(), SIZE).unwrap();
        assert_eq!(renderer.layout_passes(), 2);
    }

    #[test]
    fn test_brightness_animation_interpolates() {
        let mut renderer = WheelRenderer::default();
        renderer.animate_brightness(Brightness::MIN, 2.0, Easing::Linear, 10.0);
        assert!(renderer.tick(11.0));
        assert!((renderer.brightness().value() - 0.5).abs() < 1e-12);

        renderer.set_brightness(Brightness::new(0.9));
        assert!(!renderer.is_animating());
        assert!(!renderer.tick(12.0));
        assert_eq!(renderer.brightness().value(), 0.9);
    }

    #[test]
    fn test_highlight_ring_uses_highlight_color() {
        let mut renderer = WheelRenderer::default();
        let highlight = Hsb::new(0.0, 1.0, 1.0);
        renderer.set_highlight_color(highlight);
        renderer.set_highlight(Some(Point::new(150.0, 150.0 - 69.0)));

        let mut canvas = Recorder::default();
        renderer.render(&mut canvas, SIZE).unwrap();

        let (stroke, _, _, _, color) = canvas.calls.last().unwrap();
        assert_eq!(*stroke, Stroke::Outline);
        assert_eq!(*color, highlight);

        let (_, _, radius, _, fill) = canvas.calls[canvas.calls.len() - 2];
        assert!((fill.hue - 0.25).abs() < 1e-9);
        assert!((fill.saturation - 0.5).abs() < 1e-9);
        assert_eq!(radius, Mapper::new(renderer.config()).dot_radius(0.5));
    }

    #[test]
    fn test_highlight_outside_wheel_is_skipped() {
        let mut renderer = WheelRenderer::default();
        renderer.set_highlight(Some(Point::new(0.0, 0.0)));
        let mut canvas = Recorder::default();
        renderer.render(&mut canvas, SIZE).unwrap();
        assert!(canvas.calls.iter().all(|(stroke, ..)| *stroke == Stroke::Filled));
    }

    #[test]
    fn test_rotation_moves_dots_about_center() {
        let mut renderer = WheelRenderer::new(WheelConfig {
            shift_degree: 0.0,
            ..WheelConfig::default()
        });
        let mut plain = Recorder::default();
        renderer.render(&mut plain, SIZE).unwrap();

        renderer.set_rotation(std::f64::consts::PI);
        let mut rotated = Recorder::default();
        renderer.render(&mut rotated, SIZE).unwrap();

        let center = SIZE.center();
        let (_, a, ..) = plain.calls[0];
        let (_, b, ..) = rotated.calls[0];
        assert!((a.x - center.x + (b.x - center.x)).abs() < 1e-9);
        assert!((a.y - center.y + (b.y - center.y)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sized_surface_paints_center_only() {
        let mut renderer = WheelRenderer::default();
        let mut canvas = Recorder::default();
        renderer.render(&mut canvas, Size::default()).unwrap();
        assert_eq!(canvas.calls.len(), 1);
    }
}
