//! Input model: canonical events the host adapter translates DOM events into.
//!
//! Pointer, mouse, and touch sources all collapse into the `Contact*` family
//! keyed by a [`ContactId`]; wheel, Safari-style trackpad gesture, and keyboard
//! events keep their own variants because they carry no session. Every event
//! that participates in timing carries the host's timestamp (`time_ms`), so the
//! engine never reads a clock itself.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::{PINCH_WHEEL_FACTORS, TRACKPAD_DELTA_LIMIT, TRACKPAD_SCROLL_FACTORS, WHEEL_FACTORS};
use crate::geometry::Point;

/// Identifies one finger, pen, or mouse across its down/move/up events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub i32);

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held. Browsers also set this for trackpad pinch wheels.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// A keyboard key, as reported by the browser (e.g. `"+"`, `"0"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

/// Unit of a wheel delta (`WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount.
    pub dx: f64,
    /// Vertical scroll amount (positive = down = zoom out).
    pub dy: f64,
    /// Unit of `dx` / `dy`.
    #[serde(default)]
    pub mode: DeltaMode,
}

/// Which physical device most likely produced a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSource {
    /// Discrete mouse wheel notches.
    MouseWheel,
    /// Two-finger trackpad scroll: small pixel deltas.
    TrackpadScroll,
    /// Trackpad pinch, reported by browsers as a ctrl-modified wheel.
    PinchSimulation,
}

impl WheelSource {
    /// Classify a wheel event from its delta and modifiers.
    #[must_use]
    pub fn classify(delta: WheelDelta, modifiers: Modifiers) -> Self {
        if modifiers.ctrl {
            Self::PinchSimulation
        } else if delta.mode == DeltaMode::Pixel && delta.dy.abs() < TRACKPAD_DELTA_LIMIT {
            Self::TrackpadScroll
        } else {
            Self::MouseWheel
        }
    }

    /// Multiplicative zoom factor for one event, or `None` for a zero delta.
    #[must_use]
    pub fn zoom_factor(self, dy: f64) -> Option<f64> {
        let (out, inward) = match self {
            Self::MouseWheel => WHEEL_FACTORS,
            Self::TrackpadScroll => TRACKPAD_SCROLL_FACTORS,
            Self::PinchSimulation => PINCH_WHEEL_FACTORS,
        };
        if dy > 0.0 {
            Some(out)
        } else if dy < 0.0 {
            Some(inward)
        } else {
            None
        }
    }
}

/// Keyboard shortcuts the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ZoomIn,
    ZoomOut,
    Reset,
}

impl KeyCommand {
    /// Map a key to a command. Keys with ctrl/meta held are left to the browser.
    #[must_use]
    pub fn from_key(key: &Key, modifiers: Modifiers) -> Option<Self> {
        if modifiers.ctrl || modifiers.meta {
            return None;
        }
        match key.0.as_str() {
            "+" | "=" => Some(Self::ZoomIn),
            "-" => Some(Self::ZoomOut),
            "0" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// A platform-neutral input event. Points are in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// A finger, pen, or primary mouse button went down.
    ContactDown { id: ContactId, point: Point, time_ms: f64 },
    /// A tracked contact moved.
    ContactMove { id: ContactId, point: Point, time_ms: f64 },
    /// A tracked contact lifted.
    ContactUp { id: ContactId, point: Point, time_ms: f64 },
    /// The platform abandoned a contact (pointer cancel / leave).
    ContactCancel { id: ContactId, time_ms: f64 },
    /// Mouse wheel or trackpad scroll over the canvas.
    Wheel {
        point: Point,
        delta: WheelDelta,
        #[serde(default)]
        modifiers: Modifiers,
        time_ms: f64,
    },
    /// Trackpad gesture began (`gesturestart`).
    GestureStart { point: Point, time_ms: f64 },
    /// Trackpad gesture scale changed, relative to gesture start.
    GestureChange { scale: f64, time_ms: f64 },
    /// Trackpad gesture ended.
    GestureEnd { time_ms: f64 },
    /// A key was pressed while the canvas had focus.
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Host timestamp of the event, if it carries one.
    #[must_use]
    pub fn time_ms(&self) -> Option<f64> {
        match self {
            Self::ContactDown { time_ms, .. }
            | Self::ContactMove { time_ms, .. }
            | Self::ContactUp { time_ms, .. }
            | Self::ContactCancel { time_ms, .. }
            | Self::Wheel { time_ms, .. }
            | Self::GestureStart { time_ms, .. }
            | Self::GestureChange { time_ms, .. }
            | Self::GestureEnd { time_ms } => Some(*time_ms),
            Self::KeyDown { .. } => None,
        }
    }
}
