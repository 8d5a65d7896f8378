//! Rendering: paints the visible part of the image and the marker crosses.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the viewport and marker store and produces pixels; it never
//! mutates application state. All geometry is in CSS pixels; the device pixel
//! ratio only enters through the context transform and [`backing_size`].
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::MARKER_ARM_PX;
use crate::geometry::Size;
use crate::markers::MarkerStore;
use crate::viewport::Viewport;

const MARKER_COLOR: &str = "#E5484D";
const ANCHOR_COLOR: &str = "#3E63DD";
const MARKER_LINE_WIDTH_PX: f64 = 2.0;
const LABEL_FONT: &str = "12px sans-serif";
const LABEL_GAP_PX: f64 = 4.0;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Draw the full scene.
///
/// `image` pairs the decoded element with its native size. `css` is the canvas
/// size in CSS pixels and `dpr` the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    image: Option<(&HtmlImageElement, Size)>,
    viewport: &Viewport,
    markers: &MarkerStore,
    css: Size,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, css.width, css.height);
    ctx.set_image_smoothing_enabled(false);

    if let Some((element, native)) = image {
        if let Some((src, dst)) = visible_region(native, viewport, css) {
            ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                element, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            )?;
        }
    }

    draw_markers(ctx, markers, viewport)
}

fn draw_markers(ctx: &CanvasRenderingContext2d, markers: &MarkerStore, viewport: &Viewport) -> Result<(), JsValue> {
    ctx.set_line_width(MARKER_LINE_WIDTH_PX);
    ctx.set_font(LABEL_FONT);
    for (marker, center) in markers.projected(viewport) {
        let color = if marker.anchor { ANCHOR_COLOR } else { MARKER_COLOR };
        ctx.set_stroke_style_str(color);
        ctx.set_fill_style_str(color);

        ctx.begin_path();
        ctx.move_to(center.x - MARKER_ARM_PX, center.y);
        ctx.line_to(center.x + MARKER_ARM_PX, center.y);
        ctx.move_to(center.x, center.y - MARKER_ARM_PX);
        ctx.line_to(center.x, center.y + MARKER_ARM_PX);
        ctx.stroke();

        ctx.fill_text(&marker.label, center.x + MARKER_ARM_PX + LABEL_GAP_PX, center.y - LABEL_GAP_PX)?;
    }
    Ok(())
}

/// Source (image pixels) and destination (canvas pixels) rectangles for the
/// part of the image inside the container, or `None` if nothing is visible.
#[must_use]
pub fn visible_region(image: Size, viewport: &Viewport, container: Size) -> Option<(Rect, Rect)> {
    let zoom = viewport.zoom();
    let offset = viewport.offset();
    let scaled = viewport.scaled_size(image);

    let left = offset.x.max(0.0);
    let top = offset.y.max(0.0);
    let right = (offset.x + scaled.width).min(container.width);
    let bottom = (offset.y + scaled.height).min(container.height);
    if right <= left || bottom <= top {
        return None;
    }

    let dst = Rect { x: left, y: top, width: right - left, height: bottom - top };
    let src = Rect {
        x: (left - offset.x) / zoom,
        y: (top - offset.y) / zoom,
        width: dst.width / zoom,
        height: dst.height / zoom,
    };
    Some((src, dst))
}

/// Canvas backing-store size for a CSS size at `dpr`, at least 1x1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn backing_size(css: Size, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let side = |v: f64| (v * dpr).round().max(1.0) as u32;
    (side(css.width), side(css.height))
}
