use std::collections::HashMap;

use super::{ScrollBehavior, ScrollMetrics, ScrollSurface};

/// In-memory scroll container with named section anchors.
///
/// Stands in for a rendered panel in headless use and tests. Anchors are
/// stored as offsets from the top of the content; `section_top` reports them in
/// viewport coordinates the way a bounding rect would.
#[derive(Debug, Clone, Default)]
pub struct ScrollPanel {
    metrics: ScrollMetrics,
    viewport_top: f64,
    sections: HashMap<String, f64>,
    last_behavior: Option<ScrollBehavior>,
}

impl ScrollPanel {
    pub fn new(scroll_height: f64, client_height: f64) -> Self {
        Self {
            metrics: ScrollMetrics {
                scroll_top: 0.0,
                scroll_height,
                client_height,
            },
            ..Default::default()
        }
    }

    pub fn with_viewport_top(mut self, viewport_top: f64) -> Self {
        self.viewport_top = viewport_top;
        self
    }

    pub fn add_section(&mut self, section_id: &str, content_offset: f64) {
        self.sections.insert(section_id.to_string(), content_offset);
    }

    /// Moves the panel the way a wheel or touch gesture would. No event is
    /// delivered; callers forward it to the controller themselves.
    pub fn user_scroll(&mut self, top: f64) {
        self.metrics.scroll_top = self.metrics.clamp_offset(top);
    }

    /// Content grew or shrank (e.g. a section was expanded).
    pub fn resize(&mut self, scroll_height: f64, client_height: f64) {
        self.metrics.scroll_height = scroll_height;
        self.metrics.client_height = client_height;
        self.metrics.scroll_top = self.metrics.clamp_offset(self.metrics.scroll_top);
    }

    pub fn last_behavior(&self) -> Option<ScrollBehavior> {
        self.last_behavior
    }
}

impl ScrollSurface for ScrollPanel {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.metrics.scroll_top = self.metrics.clamp_offset(top);
        self.last_behavior = Some(behavior);
    }

    fn section_top(&self, section_id: &str) -> Option<f64> {
        self.sections
            .get(section_id)
            .map(|offset| self.viewport_top + offset - self.metrics.scroll_top)
    }

    fn viewport_top(&self) -> f64 {
        self.viewport_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_to_clamps_like_a_browser() {
        let mut panel = ScrollPanel::new(1000.0, 400.0);
        panel.scroll_to(5000.0, ScrollBehavior::Instant);
        assert_eq!(panel.metrics().scroll_top, 600.0);
        panel.scroll_to(-10.0, ScrollBehavior::Smooth);
        assert_eq!(panel.metrics().scroll_top, 0.0);
        assert_eq!(panel.last_behavior(), Some(ScrollBehavior::Smooth));
    }

    #[test]
    fn test_section_top_moves_with_scroll() {
        let mut panel = ScrollPanel::new(2000.0, 500.0).with_viewport_top(64.0);
        panel.add_section("skills", 700.0);
        assert_eq!(panel.section_top("skills"), Some(764.0));
        panel.user_scroll(200.0);
        assert_eq!(panel.section_top("skills"), Some(564.0));
        assert_eq!(panel.section_top("awards"), None);
    }

    #[test]
    fn test_shrinking_content_pulls_scroll_top_back() {
        let mut panel = ScrollPanel::new(2000.0, 500.0);
        panel.user_scroll(1400.0);
        panel.resize(800.0, 500.0);
        assert_eq!(panel.metrics().scroll_top, 300.0);
        assert_eq!(panel.metrics().ratio(), Some(1.0));
    }
}
