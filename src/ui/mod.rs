//! Floating panel geometry.
//!
//! This module contains the placement logic for the capture panel:
//! - [`anchor`]: Collision-avoiding anchor point next to a selection

pub mod anchor;

pub use anchor::{
    AnchorPoint, DEFAULT_MARGIN, PanelSize, Rect, ViewportMetrics, anchor_position,
    anchor_position_with_margin,
};
