//! Radial HSB color wheel.
//!
//! Hue follows the angle, saturation the distance from the center and
//! brightness is a single global value. The rotating variant lets the user
//! spin the wheel to change that brightness. Drawing goes through the
//! [`render::Canvas`] trait so any immediate-mode surface can host it.

pub mod color;
pub mod config;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod rotation;
pub mod selection;
pub mod tween;
pub mod wheel;

pub use color::{Brightness, Hsb};
pub use config::{WheelConfig, WheelVariant};
pub use geometry::{Point, Size};
pub use render::Canvas;
pub use tween::Easing;
pub use wheel::ColorWheel;
