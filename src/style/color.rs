use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for values that can be linearly interpolated
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

/// 8-bit RGB color, displayed as CSS `rgb(r, g, b)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// CSS `green`
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    /// CSS `yellow`
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// CSS `orange`
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    /// CSS `orangered`
    pub const ORANGE_RED: Color = Color::rgb(255, 69, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Interpolatable for Color {
    /// Per-channel RGB interpolation, rounded to the nearest integer
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| (a as f64).lerp(&(b as f64), t).round().clamp(0.0, 255.0) as u8;
        Color::rgb(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgb(color.r, color.g, color.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_display() {
        assert_eq!(Color::ORANGE.to_string(), "rgb(255, 165, 0)");
        assert_eq!(Color::GREEN.to_hex(), "#008000");
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#ffa500"), Some(Color::ORANGE));
        assert_eq!(Color::from_hex("ffa500"), None);
        assert_eq!(Color::from_hex("#ffa5"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_color_lerp_endpoints_and_midpoint() {
        assert_eq!(Color::GREEN.lerp(&Color::YELLOW, 0.0), Color::GREEN);
        assert_eq!(Color::GREEN.lerp(&Color::YELLOW, 1.0), Color::YELLOW);
        // 0 + 255 * 0.5 = 127.5 rounds up, 128 + 127 * 0.5 = 191.5 rounds up
        assert_eq!(
            Color::GREEN.lerp(&Color::YELLOW, 0.5),
            Color::rgb(128, 192, 0)
        );
    }
}
