//! Shared numeric constants for the viewport engine.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor the viewport accepts.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest zoom factor the viewport accepts.
pub const ZOOM_MAX: f64 = 10.0;

/// Zoom factor of a freshly loaded or reset image.
pub const ZOOM_DEFAULT: f64 = 1.0;

/// Multiplicative step used by the zoom buttons and `+` / `-` keys.
pub const ZOOM_STEP: f64 = 1.5;

// ── Wheel ───────────────────────────────────────────────────────

/// Coarse mouse-wheel zoom factors (out, in).
pub const WHEEL_FACTORS: (f64, f64) = (0.9, 1.1);

/// Fine trackpad-scroll zoom factors (out, in).
pub const TRACKPAD_SCROLL_FACTORS: (f64, f64) = (0.95, 1.05);

/// Ctrl-modified wheel (browser pinch simulation) zoom factors (out, in).
pub const PINCH_WHEEL_FACTORS: (f64, f64) = (0.98, 1.02);

/// Pixel-mode wheel deltas smaller than this are treated as trackpad scroll.
pub const TRACKPAD_DELTA_LIMIT: f64 = 50.0;

// ── Gestures ────────────────────────────────────────────────────

/// Movement in screen pixels beyond which a contact becomes a pan.
pub const TAP_MOVE_THRESHOLD_PX: f64 = 5.0;

/// Longest contact, in milliseconds, that still resolves as a tap.
pub const TAP_MAX_DURATION_MS: f64 = 300.0;

/// Inter-contact distances below this are treated as coincident contacts.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1e-6;

// ── Rendering ───────────────────────────────────────────────────

/// Minimum spacing between throttled render requests (one animation frame).
pub const RENDER_INTERVAL_MS: f64 = 16.0;

// ── Markers ─────────────────────────────────────────────────────

/// Default capacity of the marker store.
pub const MAX_MARKERS: usize = 512;

/// Half-length, in canvas pixels, of a marker cross at zoom 1.
pub const MARKER_ARM_PX: f64 = 8.0;
