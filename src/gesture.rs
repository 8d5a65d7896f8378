//! Gesture classification: raw contacts, wheel, trackpad, and keys in;
//! canonical intents out.
//!
//! A *session* runs from the first contact down to the last contact up. Within
//! it [`GestureState`] moves Idle → Undetermined → Panning / Zooming, and a
//! session that never leaves Undetermined may resolve as a tap on release. Any
//! pan or zoom in the session suppresses the tap.
//!
//! Pans are applied relative to the offset captured when the pan began and
//! pinches relative to the zoom captured when the pinch began, so per-event
//! rounding never compounds. The pinch anchor is fixed for the whole pinch.
//!
//! Wheel, trackpad-gesture, and key events are single-shot and do not touch
//! the session.
//!
//! All points handed to [`GestureController::handle_event`] are canvas-local.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use tracing::{debug, trace};

use crate::config::{EngineConfig, TapPolicy};
use crate::consts::MIN_PINCH_DISTANCE_PX;
use crate::geometry::Point;
use crate::input::{ContactId, InputEvent, Key, KeyCommand, Modifiers, WheelDelta, WheelSource};
use crate::viewport::{Extent, Viewport};

/// What an event amounted to, after the controller applied it to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Nothing for the host to do.
    None,
    /// The session is panning; the offset may have moved.
    Pan,
    /// Zoom was applied around `anchor`.
    ZoomAtPoint { anchor: Point },
    /// The viewport was reset to zoom 1.
    Reset,
    /// The session resolved as a tap at this canvas point.
    Tap { canvas: Point },
    /// A session or trackpad gesture ended without a tap.
    SessionEnd,
}

/// Coarse view of the session, for cursor feedback and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Undetermined,
    Panning,
    Zooming,
}

/// One tracked finger, pen, or mouse button.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    id: ContactId,
    current: Point,
}

/// Two-contact pinch parameters, fixed when the pinch begins.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pinch {
    /// Inter-contact distance at pinch start. `None` while the contacts
    /// coincide; seeded from the first usable distance.
    initial_distance: Option<f64>,
    /// Zoom when `initial_distance` was recorded.
    start_zoom: f64,
    /// Midpoint of the two contacts at pinch start.
    anchor: Point,
    /// Most recent scale applied, kept across skipped frames.
    last_scale: f64,
}

/// Session state between first contact and last release.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    /// No contact is down.
    Idle,
    /// One contact is down and has not moved past the tap threshold.
    Undetermined {
        /// Canvas position of the first contact.
        start: Point,
        /// Host timestamp of the first contact.
        start_time_ms: f64,
        /// Viewport offset when the session began.
        start_offset: Point,
    },
    /// A single contact drags the image.
    Panning {
        /// Canvas position the drag delta is measured from.
        start: Point,
        /// Viewport offset the drag delta is added to.
        start_offset: Point,
    },
    /// Two or more contacts pinch.
    Zooming(Pinch),
}

/// Safari-style trackpad gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TrackpadPinch {
    start_zoom: f64,
    anchor: Point,
}

#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    contacts: Vec<Contact>,
    trackpad: Option<TrackpadPinch>,
    tap_move_threshold_px: f64,
    tap_max_duration_ms: f64,
    tap_policy: TapPolicy,
    zoom_step: f64,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl GestureController {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: GestureState::Idle,
            contacts: Vec::new(),
            trackpad: None,
            tap_move_threshold_px: config.tap_move_threshold_px,
            tap_max_duration_ms: config.tap_max_duration_ms,
            tap_policy: config.tap_policy,
            zoom_step: config.zoom_step,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.state {
            GestureState::Idle => Phase::Idle,
            GestureState::Undetermined { .. } => Phase::Undetermined,
            GestureState::Panning { .. } => Phase::Panning,
            GestureState::Zooming(_) => Phase::Zooming,
        }
    }

    /// Whether a contact session or trackpad gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle || self.trackpad.is_some()
    }

    /// Number of contacts currently down.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Drop every contact and gesture, e.g. when the image is replaced.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.contacts.clear();
        self.trackpad = None;
    }

    /// Apply one canvas-space event to `viewport`.
    pub fn handle_event(&mut self, event: &InputEvent, viewport: &mut Viewport, extent: Extent) -> Intent {
        match event {
            InputEvent::ContactDown { id, point, time_ms } => self.contact_down(*id, *point, *time_ms, viewport),
            InputEvent::ContactMove { id, point, .. } => self.contact_move(*id, *point, viewport, extent),
            InputEvent::ContactUp { id, point, time_ms } => self.contact_release(*id, Some(*point), *time_ms, viewport),
            InputEvent::ContactCancel { id, time_ms } => self.contact_release(*id, None, *time_ms, viewport),
            InputEvent::Wheel { point, delta, modifiers, .. } => wheel(*point, *delta, *modifiers, viewport, extent),
            InputEvent::GestureStart { point, .. } => {
                self.trackpad = Some(TrackpadPinch { start_zoom: viewport.zoom(), anchor: *point });
                debug!(zoom = viewport.zoom(), "gesture: trackpad gesture started");
                Intent::None
            }
            InputEvent::GestureChange { scale, .. } => self.trackpad_change(*scale, viewport, extent),
            InputEvent::GestureEnd { .. } => {
                if self.trackpad.take().is_some() {
                    Intent::SessionEnd
                } else {
                    Intent::None
                }
            }
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, *modifiers, viewport, extent),
        }
    }

    // --- Contacts ---

    fn contact_down(&mut self, id: ContactId, point: Point, time_ms: f64, viewport: &Viewport) -> Intent {
        if self.contacts.iter().any(|c| c.id == id) {
            debug!(id = id.0, "gesture: duplicate contact down ignored");
            return Intent::None;
        }
        self.contacts.push(Contact { id, current: point });
        match self.state {
            GestureState::Idle => {
                self.state = GestureState::Undetermined { start: point, start_time_ms: time_ms, start_offset: viewport.offset() };
                debug!(x = point.x, y = point.y, "gesture: session started");
            }
            GestureState::Undetermined { .. } | GestureState::Panning { .. } => self.begin_pinch(viewport),
            GestureState::Zooming(_) => {}
        }
        Intent::None
    }

    fn contact_move(&mut self, id: ContactId, point: Point, viewport: &mut Viewport, extent: Extent) -> Intent {
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) else {
            return Intent::None;
        };
        contact.current = point;
        match self.state {
            GestureState::Idle => Intent::None,
            GestureState::Undetermined { start, start_offset, .. } => {
                if point.distance(start) <= self.tap_move_threshold_px {
                    return Intent::None;
                }
                self.state = GestureState::Panning { start, start_offset };
                debug!("gesture: undetermined -> panning");
                viewport.pan_from(start_offset, point.sub(start), extent);
                Intent::Pan
            }
            GestureState::Panning { start, start_offset } => {
                viewport.pan_from(start_offset, point.sub(start), extent);
                Intent::Pan
            }
            GestureState::Zooming(pinch) => self.pinch_move(pinch, viewport, extent),
        }
    }

    /// Release a contact. `point` is `None` for a cancel, which never taps.
    fn contact_release(&mut self, id: ContactId, point: Option<Point>, time_ms: f64, viewport: &Viewport) -> Intent {
        let Some(index) = self.contacts.iter().position(|c| c.id == id) else {
            return Intent::None;
        };
        let released = self.contacts.remove(index);
        let previous = std::mem::replace(&mut self.state, GestureState::Idle);

        match (previous, self.contacts.len()) {
            (GestureState::Undetermined { start, start_time_ms, .. }, 0) => match point {
                Some(end) if self.is_tap(start, end, time_ms - start_time_ms) => Intent::Tap { canvas: end },
                _ => {
                    debug!(x = released.current.x, y = released.current.y, "gesture: release did not qualify as tap");
                    Intent::SessionEnd
                }
            },
            (_, 0) => {
                debug!("gesture: session ended");
                Intent::SessionEnd
            }
            (_, 1) => {
                if let Some(remaining) = self.contacts.first() {
                    self.state = GestureState::Panning { start: remaining.current, start_offset: viewport.offset() };
                    debug!("gesture: pinch -> panning");
                }
                Intent::None
            }
            _ => {
                self.begin_pinch(viewport);
                Intent::None
            }
        }
    }

    fn is_tap(&self, start: Point, end: Point, duration_ms: f64) -> bool {
        let still = start.distance(end) <= self.tap_move_threshold_px;
        match self.tap_policy {
            TapPolicy::MovementOnly => still,
            TapPolicy::MovementAndDuration => still && duration_ms <= self.tap_max_duration_ms,
        }
    }

    // --- Pinch ---

    fn begin_pinch(&mut self, viewport: &Viewport) {
        let [a, b, ..] = self.contacts.as_slice() else {
            return;
        };
        let distance = a.current.distance(b.current);
        self.state = GestureState::Zooming(Pinch {
            initial_distance: usable_distance(distance),
            start_zoom: viewport.zoom(),
            anchor: a.current.midpoint(b.current),
            last_scale: 1.0,
        });
        debug!(distance, "gesture: pinch started");
    }

    fn pinch_move(&mut self, mut pinch: Pinch, viewport: &mut Viewport, extent: Extent) -> Intent {
        let [a, b, ..] = self.contacts.as_slice() else {
            return Intent::None;
        };
        let Some(distance) = usable_distance(a.current.distance(b.current)) else {
            debug!(last_scale = pinch.last_scale, "gesture: coincident contacts, pinch frame skipped");
            return Intent::None;
        };
        let Some(initial) = pinch.initial_distance else {
            pinch.initial_distance = Some(distance);
            pinch.start_zoom = viewport.zoom();
            self.state = GestureState::Zooming(pinch);
            debug!(distance, "gesture: pinch distance seeded");
            return Intent::None;
        };
        let scale = distance / initial;
        pinch.last_scale = scale;
        self.state = GestureState::Zooming(pinch);
        viewport.set_zoom_absolute(pinch.start_zoom * scale, pinch.anchor, extent);
        trace!(scale, "gesture: pinch");
        Intent::ZoomAtPoint { anchor: pinch.anchor }
    }

    // --- Single-shot sources ---

    fn trackpad_change(&mut self, scale: f64, viewport: &mut Viewport, extent: Extent) -> Intent {
        let Some(pinch) = self.trackpad else {
            return Intent::None;
        };
        if !(scale.is_finite() && scale > 0.0) {
            debug!(scale, "gesture: degenerate trackpad scale skipped");
            return Intent::None;
        }
        viewport.set_zoom_absolute(pinch.start_zoom * scale, pinch.anchor, extent);
        Intent::ZoomAtPoint { anchor: pinch.anchor }
    }

    fn key_down(&self, key: &Key, modifiers: Modifiers, viewport: &mut Viewport, extent: Extent) -> Intent {
        let Some(command) = KeyCommand::from_key(key, modifiers) else {
            return Intent::None;
        };
        let center = extent.container.center();
        match command {
            KeyCommand::ZoomIn => {
                viewport.zoom_by(self.zoom_step, center, extent);
                Intent::ZoomAtPoint { anchor: center }
            }
            KeyCommand::ZoomOut => {
                viewport.zoom_by(1.0 / self.zoom_step, center, extent);
                Intent::ZoomAtPoint { anchor: center }
            }
            KeyCommand::Reset => {
                viewport.reset(extent);
                Intent::Reset
            }
        }
    }
}

fn wheel(point: Point, delta: WheelDelta, modifiers: Modifiers, viewport: &mut Viewport, extent: Extent) -> Intent {
    let source = WheelSource::classify(delta, modifiers);
    let Some(factor) = source.zoom_factor(delta.dy) else {
        return Intent::None;
    };
    viewport.zoom_by(factor, point, extent);
    trace!(?source, factor, "gesture: wheel zoom");
    Intent::ZoomAtPoint { anchor: point }
}

fn usable_distance(distance: f64) -> Option<f64> {
    (distance.is_finite() && distance >= MIN_PINCH_DISTANCE_PX).then_some(distance)
}
