#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn extent(iw: f64, ih: f64, cw: f64, ch: f64) -> Extent {
    Extent::new(Size::new(iw, ih), Size::new(cw, ch))
}

/// 100x50 image centred in an 800x600 container.
fn small_image() -> Extent {
    extent(100.0, 50.0, 800.0, 600.0)
}

/// Image larger than its container on both axes.
fn large_image() -> Extent {
    extent(4000.0, 3000.0, 800.0, 600.0)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Deterministic pseudo-random sequence in `[0, 1)`.
struct Lcg(u64);

impl Lcg {
    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }
}

fn assert_invariant(vp: &Viewport, ext: Extent) {
    let scaled = vp.scaled_size(ext.image);
    if scaled.width <= ext.container.width {
        assert_eq!(vp.offset().x, (ext.container.width - ext.image.width * vp.zoom()) / 2.0);
    } else {
        assert!(vp.offset().x <= 0.0);
        assert!(vp.offset().x >= ext.container.width - scaled.width);
    }
    if scaled.height <= ext.container.height {
        assert_eq!(vp.offset().y, (ext.container.height - ext.image.height * vp.zoom()) / 2.0);
    } else {
        assert!(vp.offset().y <= 0.0);
        assert!(vp.offset().y >= ext.container.height - scaled.height);
    }
}

// =============================================================
// Construction
// =============================================================

#[test]
fn default_is_zoom_one_at_origin() {
    let vp = Viewport::default();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.offset(), pt(0.0, 0.0));
}

#[test]
fn new_centres_small_image() {
    let vp = Viewport::new(small_image());
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.offset(), pt(350.0, 275.0));
}

#[test]
fn new_pins_large_image_to_top_left() {
    let vp = Viewport::new(large_image());
    assert_eq!(vp.offset(), pt(0.0, 0.0));
}

#[test]
fn zoom_percentage_rounds() {
    let mut vp = Viewport::new(large_image());
    assert_eq!(vp.zoom_percentage(), 100);
    vp.zoom_by(1.5, pt(0.0, 0.0), large_image());
    assert_eq!(vp.zoom_percentage(), 150);
    vp.zoom_by(1.0 / 3.0, pt(0.0, 0.0), large_image());
    assert_eq!(vp.zoom_percentage(), 50);
}

// =============================================================
// Pan
// =============================================================

#[test]
fn pan_zero_is_noop() {
    let mut vp = Viewport::new(large_image());
    vp.pan(pt(-100.0, -100.0), large_image());
    let before = vp;
    assert!(!vp.pan(pt(0.0, 0.0), large_image()));
    assert_eq!(vp, before);
}

#[test]
fn pan_moves_large_image() {
    let mut vp = Viewport::new(large_image());
    assert!(vp.pan(pt(-120.0, -40.0), large_image()));
    assert_eq!(vp.offset(), pt(-120.0, -40.0));
}

#[test]
fn pan_cannot_reveal_space_left_of_image() {
    let mut vp = Viewport::new(large_image());
    assert!(!vp.pan(pt(500.0, 500.0), large_image()));
    assert_eq!(vp.offset(), pt(0.0, 0.0));
}

#[test]
fn pan_cannot_reveal_space_right_of_image() {
    let mut vp = Viewport::new(large_image());
    vp.pan(pt(-10_000.0, -10_000.0), large_image());
    assert_eq!(vp.offset(), pt(800.0 - 4000.0, 600.0 - 3000.0));
}

#[test]
fn pan_on_small_image_stays_centred() {
    let mut vp = Viewport::new(small_image());
    assert!(!vp.pan(pt(37.0, -12.0), small_image()));
    assert_eq!(vp.offset(), pt(350.0, 275.0));
}

#[test]
fn pan_mixed_axes_centres_one_and_clamps_other() {
    // Wide, short image: overflows horizontally, fits vertically.
    let ext = extent(2000.0, 100.0, 800.0, 600.0);
    let mut vp = Viewport::new(ext);
    vp.pan(pt(-300.0, -300.0), ext);
    assert_eq!(vp.offset(), pt(-300.0, 250.0));
}

#[test]
fn pan_from_is_relative_to_origin_not_current_offset() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    let origin = vp.offset();
    vp.pan_from(origin, pt(-10.0, -10.0), ext);
    vp.pan_from(origin, pt(-20.0, -30.0), ext);
    assert_eq!(vp.offset(), pt(-20.0, -30.0));
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_by_keeps_anchor_image_point_fixed() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    vp.pan(pt(-1000.0, -1000.0), ext);
    let anchor = pt(400.0, 300.0);
    let before = pt((anchor.x - vp.offset().x) / vp.zoom(), (anchor.y - vp.offset().y) / vp.zoom());
    vp.zoom_by(2.0, anchor, ext);
    let after = pt((anchor.x - vp.offset().x) / vp.zoom(), (anchor.y - vp.offset().y) / vp.zoom());
    assert_eq!(vp.zoom(), 2.0);
    assert!(approx_eq(before.x, after.x));
    assert!(approx_eq(before.y, after.y));
}

#[test]
fn zoom_by_clamps_to_max() {
    let mut vp = Viewport::new(large_image());
    vp.zoom_by(1000.0, pt(10.0, 10.0), large_image());
    assert_eq!(vp.zoom(), ZOOM_MAX);
}

#[test]
fn zoom_by_clamps_to_min() {
    let mut vp = Viewport::new(large_image());
    vp.zoom_by(1e-6, pt(10.0, 10.0), large_image());
    assert_eq!(vp.zoom(), ZOOM_MIN);
}

#[test]
fn zoom_by_at_max_reports_no_change() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    vp.zoom_by(100.0, pt(0.0, 0.0), ext);
    assert!(!vp.zoom_by(1.1, pt(0.0, 0.0), ext));
}

#[test]
fn zoom_by_rejects_zero_factor() {
    let mut vp = Viewport::new(small_image());
    let before = vp;
    assert!(!vp.zoom_by(0.0, pt(400.0, 300.0), small_image()));
    assert_eq!(vp, before);
}

#[test]
fn zoom_by_rejects_negative_and_nan_factors() {
    let mut vp = Viewport::new(small_image());
    let before = vp;
    assert!(!vp.zoom_by(-2.0, pt(400.0, 300.0), small_image()));
    assert!(!vp.zoom_by(f64::NAN, pt(400.0, 300.0), small_image()));
    assert!(!vp.zoom_by(f64::INFINITY, pt(400.0, 300.0), small_image()));
    assert_eq!(vp, before);
}

#[test]
fn zoom_in_then_out_round_trips() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    vp.pan(pt(-700.0, -500.0), ext);
    let start = vp;
    let anchor = pt(321.0, 123.0);
    vp.zoom_by(2.0, anchor, ext);
    vp.zoom_by(0.5, anchor, ext);
    assert!(approx_eq(vp.zoom(), start.zoom()));
    assert!(approx_eq(vp.offset().x, start.offset().x));
    assert!(approx_eq(vp.offset().y, start.offset().y));
}

#[test]
fn set_zoom_absolute_targets_value() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    vp.set_zoom_absolute(3.0, pt(400.0, 300.0), ext);
    assert!(approx_eq(vp.zoom(), 3.0));
    vp.set_zoom_absolute(50.0, pt(400.0, 300.0), ext);
    assert_eq!(vp.zoom(), ZOOM_MAX);
}

#[test]
fn zoom_two_at_centre_recentres_small_image() {
    let ext = small_image();
    let mut vp = Viewport::new(ext);
    assert!(vp.zoom_by(2.0, pt(400.0, 300.0), ext));
    assert_eq!(vp.zoom(), 2.0);
    assert_eq!(vp.offset().x, 300.0);
    assert_eq!(vp.offset().y, 250.0);
}

// =============================================================
// Reset / resize
// =============================================================

#[test]
fn reset_restores_zoom_and_centres_small_image() {
    let ext = small_image();
    let mut vp = Viewport::new(ext);
    vp.zoom_by(4.0, pt(10.0, 10.0), ext);
    assert!(vp.reset(ext));
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.offset(), pt(350.0, 275.0));
}

#[test]
fn reset_pins_large_image_to_origin() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    vp.pan(pt(-500.0, -500.0), ext);
    vp.reset(ext);
    assert_eq!(vp.offset(), pt(0.0, 0.0));
}

#[test]
fn resize_recentres_without_changing_zoom() {
    let mut vp = Viewport::new(small_image());
    vp.zoom_by(2.0, pt(400.0, 300.0), small_image());
    let grown = extent(100.0, 50.0, 1000.0, 700.0);
    assert!(vp.on_container_resize(grown));
    assert_eq!(vp.zoom(), 2.0);
    assert_eq!(vp.offset(), pt(400.0, 300.0));
}

#[test]
fn resize_growing_container_reclamps_offset() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    vp.pan(pt(-10_000.0, -10_000.0), ext);
    let grown = extent(4000.0, 3000.0, 1600.0, 1200.0);
    vp.on_container_resize(grown);
    assert_eq!(vp.offset(), pt(1600.0 - 4000.0, 1200.0 - 3000.0));
}

#[test]
fn resize_to_nan_container_does_not_panic() {
    let mut vp = Viewport::new(large_image());
    vp.on_container_resize(extent(4000.0, 3000.0, f64::NAN, f64::NAN));
}

#[test]
fn overflows_tracks_scaled_size() {
    let ext = small_image();
    let mut vp = Viewport::new(ext);
    assert!(!vp.overflows(ext));
    vp.set_zoom_absolute(10.0, pt(0.0, 0.0), ext);
    assert!(vp.overflows(ext));
}

// =============================================================
// Invariants under random operation sequences
// =============================================================

#[test]
fn zoom_stays_in_bounds_for_arbitrary_factors() {
    let ext = large_image();
    let mut vp = Viewport::new(ext);
    let mut rng = Lcg(7);
    for _ in 0..2_000 {
        let factor = rng.range(0.01, 20.0);
        let anchor = pt(rng.range(-100.0, 900.0), rng.range(-100.0, 700.0));
        if rng.next() < 0.5 {
            vp.zoom_by(factor, anchor, ext);
        } else {
            vp.set_zoom_absolute(factor, anchor, ext);
        }
        assert!(vp.zoom() >= ZOOM_MIN && vp.zoom() <= ZOOM_MAX);
    }
}

#[test]
fn bounds_invariant_holds_after_every_operation() {
    let mut rng = Lcg(42);
    for _ in 0..50 {
        let mut ext = extent(rng.range(1.0, 3000.0), rng.range(1.0, 3000.0), rng.range(50.0, 1600.0), rng.range(50.0, 1200.0));
        let mut vp = Viewport::new(ext);
        assert_invariant(&vp, ext);
        for _ in 0..40 {
            match (rng.next() * 5.0) as u32 {
                0 => {
                    vp.pan(pt(rng.range(-500.0, 500.0), rng.range(-500.0, 500.0)), ext);
                }
                1 => {
                    let anchor = pt(rng.range(0.0, ext.container.width), rng.range(0.0, ext.container.height));
                    vp.zoom_by(rng.range(0.2, 5.0), anchor, ext);
                }
                2 => {
                    vp.set_zoom_absolute(rng.range(0.05, 12.0), ext.container.center(), ext);
                }
                3 => {
                    ext.container = Size::new(rng.range(50.0, 1600.0), rng.range(50.0, 1200.0));
                    vp.on_container_resize(ext);
                }
                _ => {
                    vp.reset(ext);
                }
            }
            assert_invariant(&vp, ext);
        }
    }
}

#[test]
fn anchor_fixation_within_one_pixel() {
    let ext = extent(20_000.0, 20_000.0, 800.0, 600.0);
    let mut rng = Lcg(99);
    for _ in 0..500 {
        let mut vp = Viewport::new(ext);
        vp.set_zoom_absolute(rng.range(1.0, 4.0), pt(0.0, 0.0), ext);
        vp.pan(pt(-rng.range(2000.0, 8000.0), -rng.range(2000.0, 8000.0)), ext);
        let anchor = pt(rng.range(0.0, 800.0), rng.range(0.0, 600.0));
        let factor = rng.range(0.5, 2.0);
        let under_before = pt((anchor.x - vp.offset().x) / vp.zoom(), (anchor.y - vp.offset().y) / vp.zoom());
        vp.zoom_by(factor, anchor, ext);
        let canvas_after = pt(under_before.x * vp.zoom() + vp.offset().x, under_before.y * vp.zoom() + vp.offset().y);
        assert!(canvas_after.distance(anchor) < 1.0);
    }
}
