use gtk::prelude::*;
use gtk4 as gtk;
use huewheel::Hsb;
use palette::Srgb;

pub struct ThemeColors {
    /// Outline drawn around the selected swatch.
    pub highlight: Hsb,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            highlight: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgb::new(0.4, 0.4, 0.8),
            ),
        }
    }

    fn lookup_color(context: &gtk::StyleContext, name: &str, fallback: Srgb<f64>) -> Hsb {
        let rgb = context
            .lookup_color(name)
            .map(|c| Srgb::new(c.red() as f64, c.green() as f64, c.blue() as f64))
            .unwrap_or(fallback);
        Hsb::from(rgb)
    }
}
