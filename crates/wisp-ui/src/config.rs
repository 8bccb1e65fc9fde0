use std::time::Duration;

/// Drag-and-drop auto-scroll tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoScrollConfig {
    /// Height of the sensitive band along the top and bottom client edges.
    pub band_height: f32,
    /// Delay before the first scroll step after the pointer enters a band.
    pub dwell: Duration,
    /// Interval between subsequent scroll steps.
    pub repeat: Duration,
    /// Pixels scrolled per tick with the pointer right at the edge.
    pub max_step: f32,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            band_height: 25.0,
            dwell: Duration::from_millis(400),
            repeat: Duration::from_millis(50),
            max_step: 12.0,
        }
    }
}

/// Container behaviour knobs.
///
/// ```rust,ignore
/// let config = ContainerConfig::default()
///     .tab_wrap(true)
///     .wheel_line_height(32.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerConfig {
    pub auto_scroll: AutoScrollConfig,
    /// Pixels scrolled per wheel notch when no control claims the wheel.
    pub wheel_line_height: f32,
    /// Tab traversal wraps around instead of moving focus out of the container.
    pub tab_wrap: bool,
    /// Mouse-down focuses the hit control when it is a tab stop.
    pub focus_on_click: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            auto_scroll: AutoScrollConfig::default(),
            wheel_line_height: 24.0,
            tab_wrap: false,
            focus_on_click: true,
        }
    }
}

impl ContainerConfig {
    pub fn auto_scroll(mut self, v: AutoScrollConfig) -> Self {
        self.auto_scroll = v;
        self
    }

    pub fn wheel_line_height(mut self, v: f32) -> Self {
        self.wheel_line_height = v;
        self
    }

    pub fn tab_wrap(mut self, v: bool) -> Self {
        self.tab_wrap = v;
        self
    }

    pub fn focus_on_click(mut self, v: bool) -> Self {
        self.focus_on_click = v;
        self
    }
}
