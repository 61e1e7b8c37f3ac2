//! Piecewise-linear magnitude color scale.
//!
//! A [`ColorScale`] maps a magnitude onto a color by interpolating between
//! three control points. The domain comes from the loaded dataset
//! (`[min, (min + max) / 2, max]`) and the range is green, yellow, orange.
//! Values outside the domain saturate to the first or last color.

use crate::style::color::{Color, Interpolatable};
use crate::{QuakeMapError, Result};
use serde::{Deserialize, Serialize};

/// Immutable magnitude → color mapping, built once per dataset load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    domain: [f64; 3],
    range: [Color; 3],
}

impl ColorScale {
    /// Colors at the low, middle and high end of the magnitude domain
    pub const DEFAULT_RANGE: [Color; 3] = [Color::GREEN, Color::YELLOW, Color::ORANGE];

    /// Builds the scale from the magnitudes of a loaded earthquake set.
    ///
    /// Fails with [`QuakeMapError::InvalidInput`] when `magnitudes` is empty
    /// or contains a non-finite value.
    pub fn from_magnitudes(magnitudes: &[f64]) -> Result<Self> {
        if magnitudes.is_empty() {
            return Err(QuakeMapError::InvalidInput(
                "cannot build a color scale from an empty magnitude set".to_string(),
            ));
        }
        if let Some(bad) = magnitudes.iter().find(|m| !m.is_finite()) {
            return Err(QuakeMapError::InvalidInput(format!(
                "magnitude {bad} is not a finite number"
            )));
        }

        let (min, max) = magnitudes
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| {
                (lo.min(m), hi.max(m))
            });

        // Halve before adding so extreme finite inputs cannot overflow
        Self::with_stops([min, min / 2.0 + max / 2.0, max], Self::DEFAULT_RANGE)
    }

    /// Builds a scale from explicit control points.
    /// The domain must be finite and non-decreasing.
    pub fn with_stops(domain: [f64; 3], range: [Color; 3]) -> Result<Self> {
        if domain.iter().any(|d| !d.is_finite()) {
            return Err(QuakeMapError::InvalidInput(format!(
                "color scale domain {domain:?} is not finite"
            )));
        }
        if domain.windows(2).any(|w| w[0] > w[1]) {
            return Err(QuakeMapError::InvalidInput(format!(
                "color scale domain {domain:?} must be non-decreasing"
            )));
        }
        Ok(Self { domain, range })
    }

    pub fn domain(&self) -> [f64; 3] {
        self.domain
    }

    pub fn range(&self) -> [Color; 3] {
        self.range
    }

    pub fn min(&self) -> f64 {
        self.domain[0]
    }

    pub fn mid(&self) -> f64 {
        self.domain[1]
    }

    pub fn max(&self) -> f64 {
        self.domain[2]
    }

    /// A scale whose domain collapsed to a single value renders every
    /// magnitude with the middle color
    pub fn is_degenerate(&self) -> bool {
        self.domain[0] == self.domain[2]
    }

    /// Maps a magnitude onto a color
    pub fn color(&self, magnitude: f64) -> Color {
        let [lo, mid, hi] = self.domain;

        if self.is_degenerate() {
            return self.range[1];
        }
        if magnitude.is_nan() || magnitude <= lo {
            return self.range[0];
        }
        if magnitude >= hi {
            return self.range[2];
        }

        let (start, end, a, b) = if magnitude <= mid {
            (lo, mid, self.range[0], self.range[1])
        } else {
            (mid, hi, self.range[1], self.range[2])
        };

        // Zero-width segment: the other segment carries the whole range
        if end == start {
            return b;
        }
        a.lerp(&b, (magnitude - start) / (end - start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(magnitudes: &[f64]) -> ColorScale {
        ColorScale::from_magnitudes(magnitudes).unwrap()
    }

    #[test]
    fn test_control_points() {
        let s = scale(&[1.0, 3.0, 5.0]);
        assert_eq!(s.domain(), [1.0, 3.0, 5.0]);
        assert_eq!(s.color(1.0), Color::GREEN);
        assert_eq!(s.color(3.0), Color::YELLOW);
        assert_eq!(s.color(5.0), Color::ORANGE);
    }

    #[test]
    fn test_interpolates_upper_segment() {
        let s = scale(&[1.0, 3.0, 5.0]);
        // halfway between yellow (255,255,0) and orange (255,165,0)
        assert_eq!(s.color(4.0), Color::rgb(255, 210, 0));
    }

    #[test]
    fn test_clamps_outside_domain() {
        let s = scale(&[5.0, 1.0, 3.0]);
        assert_eq!(s.color(-2.0), Color::GREEN);
        assert_eq!(s.color(0.99), Color::GREEN);
        assert_eq!(s.color(5.01), Color::ORANGE);
        assert_eq!(s.color(9.5), Color::ORANGE);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        assert_eq!(scale(&[4.2, -0.5, 2.0]), scale(&[-0.5, 2.0, 4.2]));
    }

    #[test]
    fn test_extreme_magnitudes_keep_a_finite_midpoint() {
        let s = scale(&[f64::MAX, f64::MAX]);
        assert_eq!(s.domain(), [f64::MAX; 3]);

        let wide = scale(&[-f64::MAX, f64::MAX]);
        assert_eq!(wide.mid(), 0.0);
        assert_eq!(wide.color(0.0), Color::YELLOW);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = ColorScale::from_magnitudes(&[]).unwrap_err();
        assert!(matches!(err, QuakeMapError::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        assert!(ColorScale::from_magnitudes(&[1.0, f64::NAN]).is_err());
        assert!(ColorScale::from_magnitudes(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn test_single_value_degenerates_to_constant() {
        let s = scale(&[2.5, 2.5]);
        assert!(s.is_degenerate());
        for m in [-1.0, 2.5, 7.0] {
            assert_eq!(s.color(m), Color::YELLOW);
        }
    }

    #[test]
    fn test_decreasing_domain_is_rejected() {
        let err = ColorScale::with_stops([3.0, 2.0, 4.0], ColorScale::DEFAULT_RANGE);
        assert!(err.is_err());
    }
}
