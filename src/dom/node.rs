//! Element types: ElementId, ElementData, Placement, ScrollState.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use crate::geometry::{Orientation, Rect};

new_key_type! {
    /// Handle to an element in the [`Document`](super::Document) arena.
    pub struct ElementId;
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Fixed-position placement written by the floating positioner.
///
/// Mirrors the inline `top`/`left`/`right`/`width`/`transform` properties a
/// browser host would set on a `position: fixed` element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub top: f64,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub width: Option<f64>,
    /// Horizontal translate as a percentage of the element's own width.
    pub translate_x_percent: f64,
}

impl Placement {
    /// Anchor by the left edge, dropping any right anchor and translate.
    pub fn pin_left(&mut self, left: f64) {
        self.left = Some(left);
        self.right = None;
        self.translate_x_percent = 0.0;
    }
}

// ---------------------------------------------------------------------------
// ScrollState
// ---------------------------------------------------------------------------

/// How a programmatic scroll should animate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
    Instant,
}

/// Scroll offsets and extents of a scroll container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub left: f64,
    pub top: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
    /// Behavior of the most recent programmatic scroll, if any.
    pub last_behavior: Option<ScrollBehavior>,
}

impl ScrollState {
    /// Scroll offset along `orientation`.
    pub fn position(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.left,
            Orientation::Vertical => self.top,
        }
    }

    /// Largest reachable offset along `orientation`, never negative.
    pub fn max_extent(&self, orientation: Orientation) -> f64 {
        let extent = match orientation {
            Orientation::Horizontal => self.scroll_width - self.client_width,
            Orientation::Vertical => self.scroll_height - self.client_height,
        };
        extent.max(0.0)
    }

    /// Set the offset along `orientation`, clamped to `[0, max_extent]`.
    pub fn set_position(&mut self, orientation: Orientation, position: f64) {
        let clamped = position.clamp(0.0, self.max_extent(orientation));
        match orientation {
            Orientation::Horizontal => self.left = clamped,
            Orientation::Vertical => self.top = clamped,
        }
    }
}

// ---------------------------------------------------------------------------
// ElementData
// ---------------------------------------------------------------------------

/// Data associated with a single element.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// The element's `id` attribute, used by widgets to address it.
    pub id: Option<String>,
    /// Bounding box as last laid out by the host.
    pub rect: Rect,
    /// Inline style properties.
    pub styles: BTreeMap<String, String>,
    /// Fixed placement, when the element is floating content.
    pub placement: Option<Placement>,
    pub scroll: ScrollState,
}

impl ElementData {
    /// Create an anonymous element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `id` attribute (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the bounding box (builder).
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Set the scroll state (builder).
    pub fn with_scroll(mut self, scroll: ScrollState) -> Self {
        self.scroll = scroll;
        self
    }

    /// Read an inline style property.
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    /// Set an inline style property, replacing any previous value.
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        self.styles.insert(name.to_owned(), value.into());
    }

    /// Remove an inline style property. No-op if not present.
    pub fn remove_style(&mut self, name: &str) {
        self.styles.remove(name);
    }
}

/// Format a pixel length the way inline styles spell it.
pub fn px(value: f64) -> String {
    format!("{value}px")
}
