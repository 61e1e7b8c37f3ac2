use serde::{Deserialize, Serialize};

/// Layer-control toggle, the `overlayadd` / `overlayremove` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayEvent {
    /// An overlay was checked in the layer control
    Added(String),
    /// An overlay was unchecked in the layer control
    Removed(String),
}

impl OverlayEvent {
    pub fn added(name: impl Into<String>) -> Self {
        Self::Added(name.into())
    }

    pub fn removed(name: impl Into<String>) -> Self {
        Self::Removed(name.into())
    }

    pub fn toggled(name: impl Into<String>, visible: bool) -> Self {
        if visible {
            Self::added(name)
        } else {
            Self::removed(name)
        }
    }

    pub fn overlay(&self) -> &str {
        match self {
            Self::Added(name) | Self::Removed(name) => name,
        }
    }
}

/// Anything that can hand over pending overlay events without blocking
pub trait EventSource {
    fn poll_event(&mut self) -> Option<OverlayEvent>;
}

impl EventSource for crossbeam_channel::Receiver<OverlayEvent> {
    fn poll_event(&mut self) -> Option<OverlayEvent> {
        self.try_recv().ok()
    }
}

impl EventSource for std::collections::VecDeque<OverlayEvent> {
    fn poll_event(&mut self) -> Option<OverlayEvent> {
        self.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_drains_in_order() {
        let (tx, mut rx) = crossbeam_channel::unbounded();
        tx.send(OverlayEvent::added("Earthquakes")).unwrap();
        tx.send(OverlayEvent::removed("Earthquakes")).unwrap();

        assert_eq!(rx.poll_event(), Some(OverlayEvent::added("Earthquakes")));
        assert_eq!(rx.poll_event(), Some(OverlayEvent::removed("Earthquakes")));
        assert_eq!(rx.poll_event(), None);
    }

    #[test]
    fn test_toggled() {
        assert_eq!(
            OverlayEvent::toggled("Tectonic Plates", false),
            OverlayEvent::removed("Tectonic Plates")
        );
        assert_eq!(OverlayEvent::added("x").overlay(), "x");
    }
}
