//! Render request coalescing.
//!
//! Pointer-move floods can fire far faster than the display refreshes. The
//! throttle lets at most one render through per interval and remembers that a
//! later one was suppressed, so the next animation frame can paint the latest
//! state instead of dropping it.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use crate::consts::RENDER_INTERVAL_MS;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderThrottle {
    interval_ms: f64,
    last_render_ms: Option<f64>,
    pending: bool,
}

impl Default for RenderThrottle {
    fn default() -> Self {
        Self::new(RENDER_INTERVAL_MS)
    }
}

impl RenderThrottle {
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms, last_render_ms: None, pending: false }
    }

    /// Ask for a render at `now_ms`.
    ///
    /// Returns `true` if the caller should render now. Otherwise the request is
    /// remembered and surfaces from [`RenderThrottle::flush`].
    pub fn request(&mut self, now_ms: f64) -> bool {
        let due = self.last_render_ms.is_none_or(|last| now_ms - last >= self.interval_ms || now_ms < last);
        if due {
            self.mark_rendered(now_ms);
        } else {
            self.pending = true;
        }
        due
    }

    /// Render unconditionally (session end, discrete commands).
    pub fn force(&mut self, now_ms: f64) {
        self.mark_rendered(now_ms);
    }

    /// Animation-frame hook: returns `true` if a suppressed render is owed.
    pub fn flush(&mut self, now_ms: f64) -> bool {
        if !self.pending {
            return false;
        }
        self.mark_rendered(now_ms);
        true
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Forget all history, e.g. after an image replacement.
    pub fn reset(&mut self) {
        self.last_render_ms = None;
        self.pending = false;
    }

    fn mark_rendered(&mut self, now_ms: f64) {
        self.last_render_ms = Some(now_ms);
        self.pending = false;
    }
}
