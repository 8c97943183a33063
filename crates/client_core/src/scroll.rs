use std::sync::Arc;

use tracing::debug;

pub const DEFAULT_SCROLL_THRESHOLD: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub smooth: bool,
}

/// The optional `scrollToTop` control and the viewport it scrolls.
pub trait ScrollControl: Send + Sync {
    fn set_visible(&self, visible: bool);
    fn scroll_to(&self, request: ScrollRequest);
}

/// Visible strictly above the threshold.
pub fn scroll_button_visible(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

pub struct ScrollAssist {
    control: Option<Arc<dyn ScrollControl>>,
    threshold: f64,
}

impl ScrollAssist {
    pub fn new(control: Option<Arc<dyn ScrollControl>>, threshold: f64) -> Self {
        Self { control, threshold }
    }

    /// Returns the visibility computed for `offset`, whether or not a
    /// control is attached.
    pub fn on_scroll(&self, offset: f64) -> bool {
        let visible = scroll_button_visible(offset, self.threshold);
        if let Some(control) = &self.control {
            control.set_visible(visible);
        }
        visible
    }

    pub fn scroll_to_top(&self) {
        let Some(control) = &self.control else {
            debug!("scroll: no scroll-to-top control attached");
            return;
        };
        control.scroll_to(ScrollRequest {
            top: 0.0,
            smooth: true,
        });
    }
}
