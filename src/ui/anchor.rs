//! Placement of the floating capture panel.
//!
//! The panel prefers to sit to the right of the selection, aligned with its
//! top edge. Each axis flips to the other side when the preferred spot would
//! leave the viewport, and is clamped to the margin when neither side fits.

use serde::{Deserialize, Serialize};

/// Gap between the selection and the panel, and between panel and viewport edge.
pub const DEFAULT_MARGIN: f64 = 10.0;

/// Viewport-relative rectangle, e.g. a selection's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Size of the floating panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width: f64,
    pub height: f64,
}

impl PanelSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visible area of the page and how far it has been scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl ViewportMetrics {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub const fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

/// Top-left corner of the panel in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
}

/// Anchor the panel next to `rect` using [`DEFAULT_MARGIN`].
///
/// # Example
///
/// ```
/// use snapcard::ui::anchor::{AnchorPoint, PanelSize, Rect, ViewportMetrics, anchor_position};
///
/// let point = anchor_position(
///     Rect::new(100.0, 100.0, 200.0, 120.0),
///     PanelSize::new(160.0, 120.0),
///     ViewportMetrics::new(1920.0, 1080.0),
/// );
/// assert_eq!(point, AnchorPoint { x: 210.0, y: 100.0 });
/// ```
pub fn anchor_position(rect: Rect, panel: PanelSize, viewport: ViewportMetrics) -> AnchorPoint {
    anchor_position_with_margin(rect, panel, viewport, DEFAULT_MARGIN)
}

/// Anchor the panel next to `rect`, keeping `margin` around it.
pub fn anchor_position_with_margin(
    rect: Rect,
    panel: PanelSize,
    viewport: ViewportMetrics,
    margin: f64,
) -> AnchorPoint {
    let mut x = rect.right + viewport.scroll_x + margin;
    if x + panel.width > viewport.scroll_x + viewport.width {
        x = rect.left + viewport.scroll_x - panel.width - margin;
        if x < viewport.scroll_x {
            x = viewport.scroll_x + margin;
        }
    }

    let mut y = rect.top + viewport.scroll_y;
    if y + panel.height > viewport.scroll_y + viewport.height {
        y = rect.top + viewport.scroll_y - panel.height - margin;
        if y < viewport.scroll_y {
            y = viewport.scroll_y + margin;
        }
    }

    AnchorPoint { x, y }
}
