//! Keeps the active move inside the visible part of the move list.

pub const DEFAULT_SCROLL_MARGIN: f64 = 30.0;

/// Scroll container geometry, in whatever unit the UI measures in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewport {
    pub scroll_top: f64,
    pub client_height: f64,
    /// Distance from the bottom edge that already counts as out of view.
    pub margin: f64,
}

impl ScrollViewport {
    pub fn new(client_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            client_height,
            margin: DEFAULT_SCROLL_MARGIN,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// New scroll offset centering an element whose top sits `relative_top`
    /// below the visible top edge, or `None` when it is already visible.
    pub fn recenter(&self, relative_top: f64) -> Option<f64> {
        if relative_top < 0.0 || relative_top > self.client_height - self.margin {
            Some((self.scroll_top + relative_top - self.client_height / 2.0).max(0.0))
        } else {
            None
        }
    }

    /// Apply [`Self::recenter`]. Returns whether the offset changed.
    pub fn scroll_into_view(&mut self, relative_top: f64) -> bool {
        match self.recenter(relative_top) {
            Some(top) => {
                self.scroll_top = top;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_element_does_not_scroll() {
        let viewport = ScrollViewport::new(300.0);
        assert_eq!(viewport.recenter(0.0), None);
        assert_eq!(viewport.recenter(270.0), None);
    }

    #[test]
    fn test_element_below_is_centered() {
        let mut viewport = ScrollViewport::new(300.0);
        assert!(viewport.scroll_into_view(400.0));
        assert_eq!(viewport.scroll_top, 250.0);
    }

    #[test]
    fn test_element_above_is_centered_and_clamped() {
        let mut viewport = ScrollViewport::new(300.0);
        viewport.scroll_top = 500.0;
        assert_eq!(viewport.recenter(-100.0), Some(250.0));
        viewport.scroll_top = 50.0;
        assert_eq!(viewport.recenter(-40.0), Some(0.0));
    }

    #[test]
    fn test_margin_in_lines() {
        let viewport = ScrollViewport::new(10.0).with_margin(1.0);
        assert_eq!(viewport.recenter(9.0), None);
        assert_eq!(viewport.recenter(10.0), Some(5.0));
    }
}
