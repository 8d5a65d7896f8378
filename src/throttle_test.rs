use super::*;

#[test]
fn first_request_renders() {
    let mut t = RenderThrottle::default();
    assert!(t.request(0.0));
    assert!(!t.is_pending());
}

#[test]
fn request_within_interval_is_deferred() {
    let mut t = RenderThrottle::new(16.0);
    assert!(t.request(100.0));
    assert!(!t.request(105.0));
    assert!(t.is_pending());
}

#[test]
fn request_after_interval_renders() {
    let mut t = RenderThrottle::new(16.0);
    assert!(t.request(100.0));
    assert!(!t.request(110.0));
    assert!(t.request(116.0));
    assert!(!t.is_pending());
}

#[test]
fn flood_renders_once_per_interval() {
    let mut t = RenderThrottle::new(16.0);
    let rendered = (0..100).filter(|i| t.request(f64::from(*i))).count();
    // 0, 16, 32, 48, 64, 80, 96
    assert_eq!(rendered, 7);
    assert!(t.is_pending());
}

#[test]
fn flush_pays_out_deferred_render_once() {
    let mut t = RenderThrottle::new(16.0);
    t.request(0.0);
    t.request(4.0);
    assert!(t.flush(8.0));
    assert!(!t.flush(9.0));
}

#[test]
fn flush_without_pending_is_noop() {
    let mut t = RenderThrottle::new(16.0);
    assert!(!t.flush(0.0));
    t.request(0.0);
    assert!(!t.flush(1.0));
}

#[test]
fn force_clears_pending_and_restarts_interval() {
    let mut t = RenderThrottle::new(16.0);
    t.request(0.0);
    t.request(5.0);
    t.force(10.0);
    assert!(!t.is_pending());
    assert!(!t.request(20.0));
    assert!(t.request(26.0));
}

#[test]
fn clock_going_backwards_renders() {
    let mut t = RenderThrottle::new(16.0);
    t.request(1000.0);
    assert!(t.request(10.0));
}

#[test]
fn reset_forgets_history() {
    let mut t = RenderThrottle::new(16.0);
    t.request(0.0);
    t.request(1.0);
    t.reset();
    assert!(!t.is_pending());
    assert!(t.request(2.0));
}
