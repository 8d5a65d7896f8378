//! The image→canvas affine transform: a zoom factor and a pixel offset.
//!
//! A canvas point `c` and a floating image point `i` are related by
//! `c = i * zoom + offset`. Every mutation ends by re-applying the bounds
//! invariant ([`Viewport::clamp`]):
//!
//! - along an axis where the scaled image fits inside the container, the
//!   offset centres the image exactly;
//! - along an axis where it overflows, the offset is clamped to
//!   `[container - scaled, 0]` so no empty space shows past an image edge.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use tracing::{debug, trace};

use crate::consts::{ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN};
use crate::geometry::{Point, Size};

/// The two sizes the bounds invariant depends on, sampled for one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Native image size (zoom 1).
    pub image: Size,
    /// Current container size, queried live by the caller.
    pub container: Size,
}

impl Extent {
    #[must_use]
    pub fn new(image: Size, container: Size) -> Self {
        Self { image, container }
    }
}

/// Zoom and offset of the image inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: ZOOM_DEFAULT, offset: Point::default() }
    }
}

impl Viewport {
    /// A viewport at zoom 1, already clamped into `extent`.
    #[must_use]
    pub fn new(extent: Extent) -> Self {
        let mut viewport = Self::default();
        viewport.clamp(extent);
        viewport
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Canvas position of the image's top-left corner.
    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Image size on the canvas at the current zoom.
    #[must_use]
    pub fn scaled_size(&self, image: Size) -> Size {
        image.scaled(self.zoom)
    }

    /// Zoom as a rounded percentage, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn zoom_percentage(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Whether the scaled image overflows the container along either axis.
    #[must_use]
    pub fn overflows(&self, extent: Extent) -> bool {
        let scaled = self.scaled_size(extent.image);
        scaled.width > extent.container.width || scaled.height > extent.container.height
    }

    /// Shift the image by `delta` canvas pixels, then clamp.
    ///
    /// Returns whether the transform changed.
    pub fn pan(&mut self, delta: Point, extent: Extent) -> bool {
        let before = *self;
        self.offset = self.offset.add(delta);
        self.clamp(extent);
        trace!(dx = delta.x, dy = delta.y, "viewport: pan");
        *self != before
    }

    /// Place the image at `origin + delta`, then clamp.
    ///
    /// Drag sessions pan relative to the offset captured at session start so
    /// per-event rounding never accumulates.
    pub fn pan_from(&mut self, origin: Point, delta: Point, extent: Extent) -> bool {
        let before = *self;
        self.offset = origin.add(delta);
        self.clamp(extent);
        trace!(dx = delta.x, dy = delta.y, "viewport: pan from session origin");
        *self != before
    }

    /// Multiply zoom by `factor`, keeping the image point under `anchor` fixed.
    ///
    /// The resulting zoom is clamped to `[ZOOM_MIN, ZOOM_MAX]`. A non-positive
    /// or non-finite factor (or anchor) is ignored. Returns whether the
    /// transform changed.
    pub fn zoom_by(&mut self, factor: f64, anchor: Point, extent: Extent) -> bool {
        if !(factor.is_finite() && factor > 0.0) || !anchor.is_finite() {
            debug!(factor, "viewport: ignoring degenerate zoom request");
            return false;
        }
        let before = *self;
        let new_zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let ratio = new_zoom / self.zoom;
        self.offset = Point::new(
            anchor.x - (anchor.x - self.offset.x) * ratio,
            anchor.y - (anchor.y - self.offset.y) * ratio,
        );
        self.zoom = new_zoom;
        self.clamp(extent);
        trace!(zoom = self.zoom, ax = anchor.x, ay = anchor.y, "viewport: zoom at point");
        *self != before
    }

    /// Set zoom to `value` (clamped), anchored at `anchor`.
    ///
    /// Equivalent to `zoom_by(value / zoom, anchor)`; pinch gestures use it to
    /// apply a scale measured against the zoom at gesture start.
    pub fn set_zoom_absolute(&mut self, value: f64, anchor: Point, extent: Extent) -> bool {
        self.zoom_by(value / self.zoom, anchor, extent)
    }

    /// Zoom 1, offset at the origin, then clamp (which centres a small image).
    pub fn reset(&mut self, extent: Extent) -> bool {
        let before = *self;
        self.zoom = ZOOM_DEFAULT;
        self.offset = Point::default();
        self.clamp(extent);
        *self != before
    }

    /// Re-apply the bounds invariant against a fresh container size.
    pub fn on_container_resize(&mut self, extent: Extent) -> bool {
        let before = *self;
        self.clamp(extent);
        *self != before
    }

    /// Enforce the centring/clamping invariant on both axes.
    pub fn clamp(&mut self, extent: Extent) {
        let scaled = self.scaled_size(extent.image);
        self.offset.x = clamp_axis(self.offset.x, scaled.width, extent.container.width);
        self.offset.y = clamp_axis(self.offset.y, scaled.height, extent.container.height);
    }
}

/// Centre along an axis where the image fits, clamp where it overflows.
fn clamp_axis(offset: f64, scaled: f64, container: f64) -> f64 {
    if scaled <= container {
        (container - scaled) / 2.0
    } else {
        // max/min rather than clamp: a NaN container size must not panic.
        offset.max(container - scaled).min(0.0)
    }
}
