use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

/// Visual parameters of the wheel. All lengths are in points.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Extra padding to the view border.
    pub padding: f64,
    /// Radius of the central swatch (black and white shades).
    pub center_radius: f64,
    pub min_dot_radius: f64,
    pub max_dot_radius: f64,
    /// Spacing between rings.
    pub inner_padding: f64,
    /// Degrees by which each ring is shifted; `0` gives a straight layout,
    /// anything else a flower-ish look.
    pub shift_degree: f64,
    /// Packing tightness of the dots on a ring, in `[0, 1]`.
    pub density: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            padding: 12.0,
            center_radius: 4.0,
            min_dot_radius: 1.0,
            max_dot_radius: 6.0,
            inner_padding: 2.0,
            shift_degree: 40.0,
            density: 0.8,
        }
    }
}

impl WheelConfig {
    /// Returns a copy with every unusable value clamped into its domain.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let min_dot_radius = fix(
            "min_dot_radius",
            self.min_dot_radius,
            defaults.min_dot_radius,
            0.0,
            f64::MAX,
        );
        Self {
            padding: fix("padding", self.padding, defaults.padding, 0.0, f64::MAX),
            center_radius: fix(
                "center_radius",
                self.center_radius,
                defaults.center_radius,
                0.0,
                f64::MAX,
            ),
            min_dot_radius,
            max_dot_radius: fix(
                "max_dot_radius",
                self.max_dot_radius,
                defaults.max_dot_radius.max(min_dot_radius),
                min_dot_radius,
                f64::MAX,
            ),
            inner_padding: fix(
                "inner_padding",
                self.inner_padding,
                defaults.inner_padding,
                0.0,
                f64::MAX,
            ),
            shift_degree: fix(
                "shift_degree",
                self.shift_degree,
                defaults.shift_degree,
                f64::MIN,
                f64::MAX,
            ),
            density: fix("density", self.density, defaults.density, 0.0, 1.0),
        }
    }
}

fn fix(name: &str, value: f64, fallback: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("{name} is not finite, using {fallback}");
        return fallback;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{name} {value} out of range, clamped to {clamped}");
    }
    clamped
}

/// Whether the wheel can be spun to adjust brightness.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WheelVariant {
    #[strum(to_string = "static", serialize = "plain", serialize = "tap")]
    Static,
    #[default]
    #[strum(to_string = "rotating", serialize = "rotate", serialize = "spin")]
    Rotating,
}

impl WheelVariant {
    pub fn rotates(&self) -> bool {
        matches!(self, Self::Rotating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_deserialization() {
        let cases = vec![
            ("\"static\"", WheelVariant::Static),
            ("\"Static\"", WheelVariant::Static),
            ("\"PLAIN\"", WheelVariant::Static),
            ("\"rotating\"", WheelVariant::Rotating),
            ("\"Rotate\"", WheelVariant::Rotating),
            ("\"spin\"", WheelVariant::Rotating),
        ];

        for (json, expected) in cases {
            let deserialized: WheelVariant = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<WheelVariant>("\"wobbly\"").is_err());
    }

    #[test]
    fn test_variant_display_roundtrips_through_serialize() {
        assert_eq!(WheelVariant::Static.to_string(), "static");
        assert_eq!(
            serde_json::to_string(&WheelVariant::Rotating).unwrap(),
            "\"rotating\""
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: WheelConfig =
            serde_json::from_str(r#"{ "padding": 13.0, "shift_degree": 0.0 }"#).unwrap();
        assert_eq!(config.padding, 13.0);
        assert_eq!(config.shift_degree, 0.0);
        assert_eq!(config.density, 0.8);
        assert_eq!(config.max_dot_radius, 6.0);
    }

    #[test]
    fn test_sanitized_clamps_out_of_range_values() {
        let config = WheelConfig {
            padding: -3.0,
            density: 1.7,
            center_radius: f64::NAN,
            min_dot_radius: 5.0,
            max_dot_radius: 2.0,
            ..WheelConfig::default()
        }
        .sanitized();

        assert_eq!(config.padding, 0.0);
        assert_eq!(config.density, 1.0);
        assert_eq!(config.center_radius, 4.0);
        assert_eq!(config.max_dot_radius, 5.0);
        assert_eq!(WheelConfig::default().sanitized(), WheelConfig::default());
    }
}
