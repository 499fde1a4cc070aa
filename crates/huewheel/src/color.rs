use derive_more::{Deref, Display, Into};
use palette::{FromColor, Hsv, Srgb};
use std::f64::consts::TAU;

fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Hue/saturation/brightness triple with every component in `[0, 1]`.
///
/// `hue` is a fraction of a full turn, not degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl Hsb {
    pub fn new(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue: unit(hue),
            saturation: unit(saturation),
            brightness: unit(brightness),
        }
    }

    pub fn to_hsv(self) -> Hsv<palette::encoding::Srgb, f64> {
        Hsv::new(self.hue * 360.0, self.saturation, self.brightness)
    }

    pub fn to_srgb(self) -> Srgb<f64> {
        Srgb::from_color(self.to_hsv())
    }

    pub fn to_hex(self) -> String {
        let rgb: Srgb<u8> = self.to_srgb().into_format();
        format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Hsb> for Srgb<f64> {
    fn from(color: Hsb) -> Self {
        color.to_srgb()
    }
}

impl From<Srgb<f64>> for Hsb {
    fn from(rgb: Srgb<f64>) -> Self {
        let hsv: Hsv<palette::encoding::Srgb, f64> = Hsv::from_color(rgb);
        Hsb::new(
            hsv.hue.into_positive_degrees() / 360.0,
            hsv.saturation,
            hsv.value,
        )
    }
}

/// Global wheel brightness, clamped into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Deref, Into)]
pub struct Brightness(f64);

impl Brightness {
    pub const MIN: Brightness = Brightness(0.0);
    pub const MAX: Brightness = Brightness(1.0);

    pub fn new(value: f64) -> Self {
        Self(unit(value))
    }

    /// Brightness for a rotation arc, where a full turn is full brightness.
    pub fn from_arc(arc: f64) -> Self {
        Self::new(arc / TAU)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_arc(self) -> f64 {
        self.0 * TAU
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}
