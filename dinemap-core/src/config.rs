//! Tunables for the map session.
//!
//! Defaults mirror the mobile map screen: a 350 ms search debounce, a
//! three-character minimum query, and a 100-unit dismiss threshold on the
//! stop panel.

use std::time::Duration;

/// Autocomplete pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Idle time after the last keystroke before a request is sent.
    pub debounce: Duration,
    /// Shortest trimmed query, in characters, that triggers a request.
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(350),
            min_query_len: 3,
        }
    }
}

/// Gesture panel settings, in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    /// Vertical movement ignored before a drag is recognised.
    pub dead_zone: f64,
    /// Downward displacement beyond which a release dismisses the panel.
    pub dismiss_threshold: f64,
    /// Offset of the fully dismissed panel.
    pub dismissed_offset: f64,
    /// Duration of the settle animations.
    pub animation: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            dead_zone: 5.0,
            dismiss_threshold: 100.0,
            dismissed_offset: 400.0,
            animation: Duration::from_millis(250),
        }
    }
}

/// Viewport settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionConfig {
    /// Vertical span used when centring on a point.
    pub latitude_delta: f64,
    /// Horizontal span used when centring on a point.
    pub longitude_delta: f64,
    /// Multiplier applied to the route bounds when framing it.
    pub fit_padding: f64,
    /// Smallest span used when framing a route.
    pub min_fit_delta: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            latitude_delta: 0.0922,
            longitude_delta: 0.0421,
            fit_padding: 1.4,
            min_fit_delta: 0.01,
        }
    }
}

/// All map session settings.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use dinemap_core::SessionConfig;
///
/// let config = SessionConfig::default().with_debounce(Duration::from_millis(200));
/// assert_eq!(config.search.debounce, Duration::from_millis(200));
/// assert_eq!(config.search.min_query_len, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionConfig {
    /// Autocomplete settings.
    pub search: SearchConfig,
    /// Stop panel settings.
    pub panel: PanelConfig,
    /// Viewport settings.
    pub region: RegionConfig,
}

impl SessionConfig {
    /// Set the autocomplete debounce.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.search.debounce = debounce;
        self
    }

    /// Set the minimum query length.
    #[must_use]
    pub const fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.search.min_query_len = min_query_len;
        self
    }

    /// Replace the panel settings.
    #[must_use]
    pub const fn with_panel(mut self, panel: PanelConfig) -> Self {
        self.panel = panel;
        self
    }
}
