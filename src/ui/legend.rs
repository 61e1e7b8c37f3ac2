//! Magnitude legend.
//!
//! The legend always shows the same six bins (`0–1` .. `5+`) whatever the
//! loaded dataset spans; only the swatch colors follow the active
//! [`ColorScale`].

use crate::core::constants::LEGEND_CATEGORIES;
use crate::style::{color::Color, scale::ColorScale};
use crate::ui::popup::escape_html;
use serde::{Deserialize, Serialize};

/// Which magnitude a bin's swatch samples from the color scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendSampling {
    /// `lower + 1`, the sampling the classic USGS map legend uses
    #[default]
    ShiftedByOne,
    /// The bin's own lower bound
    LowerBound,
}

impl LegendSampling {
    fn sample(&self, lower: u32) -> f64 {
        match self {
            LegendSampling::ShiftedByOne => lower as f64 + 1.0,
            LegendSampling::LowerBound => lower as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendBin {
    pub lower: u32,
    /// `None` for the open-ended last bin
    pub upper: Option<u32>,
    pub color: Color,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    bins: Vec<LegendBin>,
}

impl Legend {
    pub fn build(scale: &ColorScale) -> Self {
        Self::build_with(scale, LegendSampling::default())
    }

    pub fn build_with(scale: &ColorScale, sampling: LegendSampling) -> Self {
        let bins = LEGEND_CATEGORIES
            .iter()
            .enumerate()
            .map(|(i, &lower)| {
                let upper = LEGEND_CATEGORIES.get(i + 1).copied();
                let label = match upper {
                    Some(upper) => format!("{lower}\u{2013}{upper}"),
                    None => format!("{lower}+"),
                };
                LegendBin {
                    lower,
                    upper,
                    color: scale.color(sampling.sample(lower)),
                    label,
                }
            })
            .collect();

        Self {
            title: "Magnitude".to_string(),
            bins,
        }
    }

    pub fn bins(&self) -> &[LegendBin] {
        &self.bins
    }

    /// Leaflet-style `div.info.legend` markup, one `<i>` swatch per bin
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"info legend\"><h4>{}</h4>",
            escape_html(&self.title)
        );
        for bin in &self.bins {
            html.push_str(&format!(
                "<i style=\"background:{}\"></i> {}<br>",
                bin.color.to_hex(),
                escape_html(&bin.label)
            ));
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ColorScale {
        ColorScale::from_magnitudes(&[1.0, 3.0, 5.0]).unwrap()
    }

    #[test]
    fn test_six_bins_with_labels() {
        let legend = Legend::build(&scale());
        let labels: Vec<&str> = legend.bins().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["0–1", "1–2", "2–3", "3–4", "4–5", "5+"]);
        assert_eq!(legend.bins()[5].upper, None);
    }

    #[test]
    fn test_bins_do_not_depend_on_dataset_range() {
        let narrow = ColorScale::from_magnitudes(&[0.2, 0.4]).unwrap();
        let legend = Legend::build(&narrow);
        assert_eq!(legend.bins().len(), 6);
        assert_eq!(legend.bins()[0].label, "0–1");
    }

    #[test]
    fn test_swatches_sample_one_above_lower_bound() {
        let s = scale();
        let legend = Legend::build(&s);
        for bin in legend.bins() {
            assert_eq!(bin.color, s.color(bin.lower as f64 + 1.0));
        }
        // bin 0 samples magnitude 1 (green), bin 2 samples 3 (yellow)
        assert_eq!(legend.bins()[0].color, Color::GREEN);
        assert_eq!(legend.bins()[2].color, Color::YELLOW);
        assert_eq!(legend.bins()[4].color, Color::ORANGE);
    }

    #[test]
    fn test_lower_bound_sampling() {
        let s = scale();
        let legend = Legend::build_with(&s, LegendSampling::LowerBound);
        assert_eq!(legend.bins()[1].color, Color::GREEN);
        assert_eq!(legend.bins()[3].color, Color::YELLOW);
        assert_eq!(legend.bins()[5].color, Color::ORANGE);
    }

    #[test]
    fn test_html_has_a_swatch_per_bin() {
        let html = Legend::build(&scale()).to_html();
        assert_eq!(html.matches("<i style=").count(), 6);
        assert!(html.contains("#008000"));
        assert!(html.ends_with("5+<br></div>"));
    }
}
