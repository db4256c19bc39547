//! Interop configuration: gesture thresholds and positioning constants.

// ---------------------------------------------------------------------------
// InteropConfig
// ---------------------------------------------------------------------------

/// Tunable constants shared by the listener module.
///
/// The defaults are the values widgets are built against; hosts only override
/// them for unusual input devices or dense layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct InteropConfig {
    /// Downward drag (px) past which releasing a drawer dismisses it.
    pub drawer_dismiss_threshold: f64,
    /// Minimum travel (px) along the carousel axis to count as a swipe.
    pub swipe_threshold: f64,
    /// Gap (px) between a reference element and its floating content.
    pub floating_gap: f64,
    /// Distance (px) kept from the viewport edge when correcting overflow.
    pub viewport_margin: f64,
}

impl Default for InteropConfig {
    fn default() -> Self {
        Self {
            drawer_dismiss_threshold: 100.0,
            swipe_threshold: 50.0,
            floating_gap: 4.0,
            viewport_margin: 8.0,
        }
    }
}

impl InteropConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drawer dismiss threshold (builder).
    pub fn with_drawer_dismiss_threshold(mut self, px: f64) -> Self {
        self.drawer_dismiss_threshold = px;
        self
    }

    /// Set the carousel swipe threshold (builder).
    pub fn with_swipe_threshold(mut self, px: f64) -> Self {
        self.swipe_threshold = px;
        self
    }

    /// Set the floating gap (builder).
    pub fn with_floating_gap(mut self, px: f64) -> Self {
        self.floating_gap = px;
        self
    }

    /// Set the viewport margin (builder).
    pub fn with_viewport_margin(mut self, px: f64) -> Self {
        self.viewport_margin = px;
        self
    }
}
