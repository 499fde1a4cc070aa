use cairo::Context;
use huewheel::render::Canvas;
use huewheel::{Hsb, Point};
use std::f64::consts::TAU;

/// Paints the wheel onto a cairo context.
pub struct CairoCanvas<'a> {
    cr: &'a Context,
}

impl<'a> CairoCanvas<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self { cr }
    }

    fn circle(&self, center: Point, radius: f64, line_width: f64, color: Hsb) {
        let rgb = color.to_srgb();
        self.cr.set_source_rgb(rgb.red, rgb.green, rgb.blue);
        self.cr.set_line_width(line_width);
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius, 0.0, TAU);
    }
}

impl Canvas for CairoCanvas<'_> {
    type Error = cairo::Error;

    fn fill_stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Hsb,
    ) -> Result<(), Self::Error> {
        self.circle(center, radius, line_width, color);
        self.cr.fill_preserve()?;
        self.cr.stroke()
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        line_width: f64,
        color: Hsb,
    ) -> Result<(), Self::Error> {
        self.circle(center, radius, line_width, color);
        self.cr.stroke()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Format, ImageSurface};

    fn pixel(surface: &mut ImageSurface, x: usize, y: usize) -> [u8; 4] {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]
    }

    #[test]
    fn test_fill_stroke_paints_the_disc() {
        let mut surface = ImageSurface::create(Format::ARgb32, 20, 20).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            let mut canvas = CairoCanvas::new(&cr);
            canvas
                .fill_stroke_circle(Point::new(10.0, 10.0), 5.0, 1.0, Hsb::new(0.0, 1.0, 1.0))
                .unwrap();
        }
        surface.flush();

        // ARGB32 is stored native-endian, so BGRA on little-endian hosts
        let expected = if cfg!(target_endian = "little") {
            [0, 0, 255, 255]
        } else {
            [255, 255, 0, 0]
        };
        assert_eq!(pixel(&mut surface, 10, 10), expected);
        assert_eq!(pixel(&mut surface, 1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_stroke_leaves_the_center_empty() {
        let mut surface = ImageSurface::create(Format::ARgb32, 20, 20).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            let mut canvas = CairoCanvas::new(&cr);
            canvas
                .stroke_circle(Point::new(10.0, 10.0), 8.0, 1.0, Hsb::new(0.5, 1.0, 1.0))
                .unwrap();
        }
        surface.flush();

        assert_eq!(pixel(&mut surface, 10, 10), [0, 0, 0, 0]);
        assert_ne!(pixel(&mut surface, 18, 10)[3], 0);
    }
}
