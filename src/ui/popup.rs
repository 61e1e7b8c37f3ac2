use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Information bubble attached to a marker, shown on hover or click
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub position: LatLng,
    pub title: String,
    pub lines: Vec<String>,
}

impl Popup {
    pub fn new(position: LatLng, title: impl Into<String>) -> Self {
        Self {
            position,
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Popup for one earthquake: coordinates as `lat, lon`, then place and
    /// magnitude
    pub fn for_earthquake(position: LatLng, place: &str, magnitude: f64) -> Self {
        Self::new(
            position,
            format!("Coordinates: {}, {}", position.lat, position.lng),
        )
        .with_line(format!("Place: {place}"))
        .with_line(format!("Magnitude: {magnitude}"))
    }

    /// Title followed by the body lines, newline separated
    pub fn text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.lines.iter().any(|l| l.contains(needle))
    }

    /// `<h4>title</h4><p>line<br>line</p>` markup with escaped text
    pub fn to_html(&self) -> String {
        let body: Vec<String> = self.lines.iter().map(|l| escape_html(l)).collect();
        format!(
            "<h4>{}</h4><p>{}</p>",
            escape_html(&self.title),
            body.join("<br>")
        )
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earthquake_popup_text() {
        let popup = Popup::for_earthquake(LatLng::new(37.7, -122.4), "Bay Area", 2.0);
        assert_eq!(
            popup.text(),
            "Coordinates: 37.7, -122.4\nPlace: Bay Area\nMagnitude: 2"
        );
        assert!(popup.contains("Bay Area"));
    }

    #[test]
    fn test_html_escapes_place() {
        let popup = Popup::for_earthquake(LatLng::new(1.5, 2.5), "<Ridge & Rift>", 4.25);
        assert_eq!(
            popup.to_html(),
            "<h4>Coordinates: 1.5, 2.5</h4><p>Place: &lt;Ridge &amp; Rift&gt;<br>Magnitude: 4.25</p>"
        );
    }
}
