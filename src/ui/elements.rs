use serde::{Deserialize, Serialize};

/// Screen corner a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    /// Leaflet's CSS name for the corner (`"bottomright"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLeft => "topleft",
            Position::TopRight => "topright",
            Position::BottomLeft => "bottomleft",
            Position::BottomRight => "bottomright",
        }
    }

    #[cfg(feature = "egui")]
    pub fn calculate_rect(
        &self,
        container: egui::Rect,
        size: egui::Vec2,
        margin: f32,
    ) -> egui::Rect {
        use egui::{Pos2, Rect};

        let left = container.min.x + margin;
        let right = container.max.x - margin - size.x;
        let top = container.min.y + margin;
        let bottom = container.max.y - margin - size.y;

        let pos = match self {
            Position::TopLeft => Pos2::new(left, top),
            Position::TopRight => Pos2::new(right, top),
            Position::BottomLeft => Pos2::new(left, bottom),
            Position::BottomRight => Pos2::new(right, bottom),
        };
        Rect::from_min_size(pos, size)
    }
}

#[cfg(all(test, feature = "egui"))]
mod tests {
    use super::*;
    use egui::{Pos2, Rect, Vec2};

    #[test]
    fn test_bottom_right_anchor() {
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let rect = Position::BottomRight.calculate_rect(container, Vec2::new(100.0, 50.0), 10.0);
        assert_eq!(rect.min, Pos2::new(690.0, 540.0));
        assert_eq!(rect.max, Pos2::new(790.0, 590.0));
    }
}
