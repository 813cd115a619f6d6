//! Renderer configuration.

/// Knobs for [`LayoutRenderer`](crate::LayoutRenderer) and
/// [`ResizeController`](crate::ResizeController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Pointer travel (cells) before a press on a divider starts resizing.
    /// Zero resizes immediately.
    pub drag_threshold: u16,
    /// Title shown on error placeholders.
    pub error_title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 0,
            error_title: "Component error".to_string(),
        }
    }
}

impl RendererConfig {
    #[must_use]
    pub fn drag_threshold(mut self, threshold: u16) -> Self {
        self.drag_threshold = threshold;
        self
    }

    #[must_use]
    pub fn error_title(mut self, title: impl Into<String>) -> Self {
        self.error_title = title.into();
        self
    }
}
