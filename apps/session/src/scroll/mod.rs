//! Dual-Scroll Controller: keeps the original (left) and tailored (right)
//! resume panels at the same relative position.
//!
//! Alignment is ratio-based: a panel scrolled to 40% of its range moves the
//! other panel to 40% of *its* range. The two documents have different section
//! lengths, so this is an approximation, not a content-aware alignment.
//!
//! The controller is toolkit-agnostic: a frontend binds its scroll containers
//! through `ScrollSurface` and forwards native scroll events to `on_scroll`.

mod panel;

pub use panel::ScrollPanel;

use tracing::debug;

/// Gap left above a section anchor after `scroll_to_section`.
pub const SECTION_TOP_MARGIN: f64 = 20.0;

/// Positions within this many pixels count as "the same".
const POSITION_TOLERANCE: f64 = 1.0;

/// A programmatic scroll stops being suppressed after this many events even if
/// it never reached its target (e.g. the user grabbed the panel mid-animation).
const MAX_SUPPRESSED_EVENTS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Scrollable distance; zero when the content fits in the viewport.
    pub fn range(&self) -> f64 {
        let range = self.scroll_height - self.client_height;
        if range.is_finite() {
            range.max(0.0)
        } else {
            0.0
        }
    }

    /// `scroll_top / range` clamped to `[0, 1]`, or `None` when nothing scrolls.
    pub fn ratio(&self) -> Option<f64> {
        let range = self.range();
        if range <= 0.0 || !self.scroll_top.is_finite() {
            return None;
        }
        Some((self.scroll_top / range).clamp(0.0, 1.0))
    }

    pub fn clamp_offset(&self, offset: f64) -> f64 {
        if offset.is_finite() {
            offset.clamp(0.0, self.range())
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSide {
    Left,
    Right,
}

impl PanelSide {
    pub fn other(self) -> Self {
        match self {
            PanelSide::Left => PanelSide::Right,
            PanelSide::Right => PanelSide::Left,
        }
    }

    fn index(self) -> usize {
        match self {
            PanelSide::Left => 0,
            PanelSide::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// One scrollable panel as the controller sees it.
pub trait ScrollSurface {
    fn metrics(&self) -> ScrollMetrics;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Top edge of the anchor for `section_id` in viewport coordinates
    /// (a bounding-rect `top`), or `None` if the panel has no such anchor.
    fn section_top(&self, section_id: &str) -> Option<f64>;

    /// Top edge of the panel's scroll container in viewport coordinates.
    fn viewport_top(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
struct Suppression {
    target: f64,
    remaining: u32,
}

#[derive(Debug)]
pub struct DualScrollController {
    sync_enabled: bool,
    attached: bool,
    /// Programmatic scrolls still in flight, per side. Scroll events they
    /// produce must not be mirrored back.
    suppressed: [Option<Suppression>; 2],
}

impl Default for DualScrollController {
    fn default() -> Self {
        Self {
            sync_enabled: true,
            attached: false,
            suppressed: [None, None],
        }
    }
}

impl DualScrollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Starts mirroring when both panels exist and sync is on. Safe to call
    /// repeatedly; returns whether the controller is now attached.
    pub fn attach(
        &mut self,
        left: Option<&dyn ScrollSurface>,
        right: Option<&dyn ScrollSurface>,
    ) -> bool {
        if self.attached {
            return true;
        }
        if !self.sync_enabled || left.is_none() || right.is_none() {
            return false;
        }
        self.attached = true;
        self.suppressed = [None, None];
        debug!("Scroll sync attached");
        true
    }

    /// Stops mirroring. Safe to call when already detached.
    pub fn detach(&mut self) {
        if self.attached {
            debug!("Scroll sync detached");
        }
        self.attached = false;
        self.suppressed = [None, None];
    }

    /// Disabling detaches but leaves both panels where they are. Enabling
    /// takes effect on the next `attach`.
    pub fn set_sync_enabled(&mut self, enabled: bool) {
        self.sync_enabled = enabled;
        if !enabled {
            self.detach();
        }
    }

    /// Handles a native scroll event from `side`. Returns the offset written
    /// to the other panel, or `None` if nothing was mirrored.
    pub fn on_scroll(
        &mut self,
        side: PanelSide,
        left: &mut dyn ScrollSurface,
        right: &mut dyn ScrollSurface,
    ) -> Option<f64> {
        if !self.attached {
            return None;
        }

        match side {
            PanelSide::Left => self.mirror(side, left, right),
            PanelSide::Right => self.mirror(side, right, left),
        }
    }

    fn mirror(
        &mut self,
        side: PanelSide,
        source: &dyn ScrollSurface,
        target: &mut dyn ScrollSurface,
    ) -> Option<f64> {
        let source_metrics = source.metrics();
        if self.swallow_echo(side, source_metrics.scroll_top) {
            return None;
        }

        let ratio = source_metrics.ratio()?;
        let target_metrics = target.metrics();
        let range = target_metrics.range();
        if range <= 0.0 {
            return None;
        }

        let offset = ratio * range;
        if (offset - target_metrics.scroll_top).abs() < POSITION_TOLERANCE {
            return None;
        }

        target.scroll_to(offset, ScrollBehavior::Instant);
        self.suppress(side.other(), offset);
        Some(offset)
    }

    /// Smooth-scrolls the left panel so the anchor for `section_id` sits
    /// `SECTION_TOP_MARGIN` below the top of the panel. With sync on, the right
    /// panel gets the same absolute offset: both documents share section
    /// anchors, so no ratio translation is applied. Returns the left offset.
    pub fn scroll_to_section(
        &mut self,
        section_id: &str,
        left: &mut dyn ScrollSurface,
        right: &mut dyn ScrollSurface,
    ) -> Option<f64> {
        let anchor_top = left.section_top(section_id)?;
        let metrics = left.metrics();
        let offset = metrics.clamp_offset(
            metrics.scroll_top + (anchor_top - left.viewport_top()) - SECTION_TOP_MARGIN,
        );

        self.move_panel(PanelSide::Left, left, offset);

        if self.sync_enabled {
            let right_offset = right.metrics().clamp_offset(offset);
            self.move_panel(PanelSide::Right, right, right_offset);
        }

        debug!("Scrolled to section '{section_id}' at {offset:.0}px");
        Some(offset)
    }

    /// Smooth-scrolls `surface` to `offset`. A panel already there is left
    /// untouched: the host fires no scroll event for it, so there is no echo
    /// to suppress.
    fn move_panel(&mut self, side: PanelSide, surface: &mut dyn ScrollSurface, offset: f64) {
        if (offset - surface.metrics().scroll_top).abs() < POSITION_TOLERANCE {
            return;
        }
        surface.scroll_to(offset, ScrollBehavior::Smooth);
        self.suppress(side, offset);
    }

    fn suppress(&mut self, side: PanelSide, target: f64) {
        if self.attached {
            self.suppressed[side.index()] = Some(Suppression {
                target,
                remaining: MAX_SUPPRESSED_EVENTS,
            });
        }
    }

    /// True when this event comes from our own programmatic scroll on `side`.
    fn swallow_echo(&mut self, side: PanelSide, scroll_top: f64) -> bool {
        let slot = &mut self.suppressed[side.index()];
        let Some(mut suppression) = *slot else {
            return false;
        };

        if (scroll_top - suppression.target).abs() < POSITION_TOLERANCE {
            *slot = None;
            return true;
        }

        suppression.remaining = suppression.remaining.saturating_sub(1);
        if suppression.remaining == 0 {
            *slot = None;
            return false;
        }
        *slot = Some(suppression);
        true
    }
}
