//! Viewport transform and coordinate-picking engine for a browser image viewer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A user loads a
//! raster image onto a pannable, zoomable canvas and taps positions to record
//! 1-based image pixel coordinates. The engine owns the image↔canvas transform,
//! classifies pointer, touch, wheel, trackpad, and keyboard input into pan,
//! zoom, and tap intents, and resolves taps against the image bounds. The host
//! JavaScript layer wires DOM events to [`engine::Engine`] and reacts to the
//! returned [`engine::Action`]s (cursor, zoom label, repaint, clipboard).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`viewport`] | Zoom/offset transform and its centring/clamping invariant |
//! | [`mapper`] | Screen → canvas → image conversions and tap resolution |
//! | [`gesture`] | Session state machine turning events into intents |
//! | [`input`] | Canonical input events, wheel classification, key commands |
//! | [`throttle`] | Frame-interval render coalescing |
//! | [`surface`] | Native image size and the live container-size query |
//! | [`markers`] | Recorded coordinate list, reordering, and export |
//! | [`render`] | Canvas 2D painting of the image and markers |
//! | [`config`] | Tunable thresholds with JSON and environment overrides |
//! | [`geometry`] | `Point` and `Size` value types |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (zoom limits, thresholds, wheel factors) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod mapper;
pub mod markers;
pub mod render;
pub mod surface;
pub mod throttle;
pub mod viewport;
