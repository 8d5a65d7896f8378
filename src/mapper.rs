//! Conversions between screen, canvas, and image coordinates.
//!
//! - **Screen** points come from pointer events (viewport-relative).
//! - **Canvas** points are local to the drawing surface: screen minus the
//!   canvas's on-screen origin.
//! - **Image** points are native raster pixels. Internally 0-based and
//!   floored; users see them 1-based through [`ImageCoord`].
//!
//! All functions are pure and read a [`Viewport`] snapshot.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MapError;
use crate::geometry::Point;
use crate::surface::ImageSurface;
use crate::viewport::Viewport;

/// A 1-based image pixel coordinate, `1 <= x <= width`, `1 <= y <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageCoord {
    pub x: u32,
    pub y: u32,
}

impl ImageCoord {
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Clipboard form: `x,y`.
impl fmt::Display for ImageCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A floored, 0-based image pixel index. May lie outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelIndex {
    pub x: i64,
    pub y: i64,
}

/// Convert a screen point to canvas-local pixels.
#[must_use]
pub fn screen_to_canvas(screen: Point, canvas_origin: Point) -> Point {
    screen.sub(canvas_origin)
}

/// Undo the viewport transform, yielding floating image-pixel coordinates.
#[must_use]
pub fn canvas_to_image_f64(canvas: Point, viewport: &Viewport) -> Point {
    let offset = viewport.offset();
    let zoom = viewport.zoom();
    Point::new((canvas.x - offset.x) / zoom, (canvas.y - offset.y) / zoom)
}

/// Undo the viewport transform and floor to a 0-based pixel index.
///
/// Returns `None` if the mapped point is not finite.
#[must_use]
pub fn canvas_to_image(canvas: Point, viewport: &Viewport) -> Option<PixelIndex> {
    let offset = viewport.offset();
    let zoom = viewport.zoom();
    Some(PixelIndex { x: floor_pixel(canvas.x, offset.x, zoom)?, y: floor_pixel(canvas.y, offset.y, zoom)? })
}

/// Resolve a canvas tap to a 1-based image coordinate.
///
/// # Errors
///
/// Returns [`MapError::OutOfBounds`] when the floored pixel falls outside
/// `[0, width) x [0, height)`. The upper bound is exclusive: a tap exactly on
/// the right or bottom edge misses. Returns [`MapError::NonFinite`] for a NaN
/// or infinite tap position.
pub fn map_tap_to_coordinate(canvas: Point, viewport: &Viewport, surface: &ImageSurface) -> Result<ImageCoord, MapError> {
    let Some(pixel) = canvas_to_image(canvas, viewport) else {
        debug!(x = canvas.x, y = canvas.y, "mapper: tap maps to a non-finite image point");
        return Err(MapError::NonFinite);
    };
    let in_x = (0..i64::from(surface.width())).contains(&pixel.x);
    let in_y = (0..i64::from(surface.height())).contains(&pixel.y);
    if !(in_x && in_y) {
        return Err(MapError::OutOfBounds { x: pixel.x, y: pixel.y });
    }
    match (u32::try_from(pixel.x + 1), u32::try_from(pixel.y + 1)) {
        (Ok(x), Ok(y)) => Ok(ImageCoord { x, y }),
        _ => Err(MapError::OutOfBounds { x: pixel.x, y: pixel.y }),
    }
}

/// Canvas position of the top-left corner of a stored 1-based coordinate.
///
/// Left inverse of [`map_tap_to_coordinate`]: tapping the returned point maps
/// back to `coord`.
#[must_use]
pub fn image_to_canvas(coord: ImageCoord, viewport: &Viewport) -> Point {
    let offset = viewport.offset();
    let zoom = viewport.zoom();
    Point::new(
        (f64::from(coord.x) - 1.0) * zoom + offset.x,
        (f64::from(coord.y) - 1.0) * zoom + offset.y,
    )
}

/// Canvas position of the centre of a stored 1-based coordinate's pixel.
#[must_use]
pub fn image_to_canvas_center(coord: ImageCoord, viewport: &Viewport) -> Point {
    let corner = image_to_canvas(coord, viewport);
    let half = viewport.zoom() * 0.5;
    Point::new(corner.x + half, corner.y + half)
}

/// Floor one axis to the pixel whose canvas span `[p * zoom + offset, (p + 1) * zoom + offset)`
/// contains `canvas`.
#[allow(clippy::cast_possible_truncation)]
fn floor_pixel(canvas: f64, offset: f64, zoom: f64) -> Option<i64> {
    let image = (canvas - offset) / zoom;
    if !image.is_finite() {
        return None;
    }
    let mut pixel = image.floor();
    // The division can land one ULP across a pixel edge. Settle against the
    // edges exactly as `image_to_canvas` computes them.
    if pixel * zoom + offset > canvas {
        pixel -= 1.0;
    } else if (pixel + 1.0) * zoom + offset <= canvas {
        pixel += 1.0;
    }
    // Saturating cast: anything past i64 range is out of bounds regardless.
    Some(pixel as i64)
}
