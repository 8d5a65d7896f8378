use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::EngineConfig;
use crate::consts::{ZOOM_MAX, ZOOM_MIN};
use crate::error::{MapError, StoreError, SurfaceError};
use crate::geometry::{Point, Size};
use crate::gesture::{GestureController, Intent, Phase};
use crate::input::InputEvent;
use crate::mapper::{self, ImageCoord, PixelIndex};
use crate::markers::{MarkerId, MarkerStore};
use crate::render;
use crate::surface::{ContainerSize, ImageSurface};
use crate::throttle::RenderThrottle;
use crate::viewport::{Extent, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Pointer cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// The whole image is visible; clicks record coordinates.
    Crosshair,
    /// The image overflows the container and can be dragged.
    Grab,
    /// A contact session is in progress.
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Crosshair => "crosshair",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    TapResolved(ImageCoord),
    TapRejected(MapError),
    ZoomChanged { percent: u32 },
    SetCursor(Cursor),
    ImageLoaded { width: u32, height: u32 },
    MarkerAdded(MarkerId),
    MarkerRejected(StoreError),
}

/// Viewer state and input handling that do not need the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// Until an image is loaded every input and zoom call is a no-op that returns
/// no actions.
pub struct EngineCore {
    image: Option<ImageSurface>,
    viewport: Viewport,
    gestures: GestureController,
    throttle: RenderThrottle,
    config: EngineConfig,
    container: Box<dyn ContainerSize>,
    canvas_origin: Point,
    cursor: Option<Cursor>,
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig, container: impl ContainerSize + 'static) -> Self {
        Self {
            image: None,
            viewport: Viewport::default(),
            gestures: GestureController::new(&config),
            throttle: RenderThrottle::new(config.render_interval_ms),
            config,
            container: Box::new(container),
            canvas_origin: Point::default(),
            cursor: None,
        }
    }

    // --- Image ---

    /// Replace the image. Viewport, gesture, and throttle state start over.
    pub fn load_image(&mut self, surface: ImageSurface) -> Vec<Action> {
        let replaced = self.image.replace(surface).is_some();
        let extent = self.extent(surface);
        self.viewport = Viewport::new(extent);
        self.gestures.reset();
        self.throttle.reset();
        info!(width = surface.width(), height = surface.height(), replaced, "engine: image loaded");

        let mut actions = vec![
            Action::ImageLoaded { width: surface.width(), height: surface.height() },
            Action::ZoomChanged { percent: self.viewport.zoom_percentage() },
        ];
        self.push_cursor(extent, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Decode image bytes and load the result.
    ///
    /// # Errors
    ///
    /// Returns the decode or empty-image error; the current image is kept.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<Vec<Action>, SurfaceError> {
        let surface = ImageSurface::from_bytes(bytes)?;
        Ok(self.load_image(surface))
    }

    // --- Input ---

    /// Record the canvas's on-screen top-left, subtracted from every event.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Feed one screen-space input event through the gesture controller.
    pub fn handle_event(&mut self, event: &InputEvent) -> Vec<Action> {
        let Some(image) = self.image else {
            return Vec::new();
        };
        let extent = self.extent(image);
        let event = self.to_canvas(event);
        let before = self.viewport;
        let intent = self.gestures.handle_event(&event, &mut self.viewport, extent);

        let mut actions = Vec::new();
        if let Intent::Tap { canvas } = intent {
            match mapper::map_tap_to_coordinate(canvas, &self.viewport, &image) {
                Ok(coord) => {
                    debug!(%coord, "engine: tap resolved");
                    actions.push(Action::TapResolved(coord));
                }
                Err(err) => {
                    debug!(%err, "engine: tap rejected");
                    actions.push(Action::TapRejected(err));
                }
            }
        }
        self.push_zoom_change(before, &mut actions);
        self.push_cursor(extent, &mut actions);

        let settles = matches!(intent, Intent::Tap { .. } | Intent::SessionEnd | Intent::Reset)
            || (matches!(event, InputEvent::KeyDown { .. }) && intent != Intent::None);
        let render = if settles {
            if let Some(now) = event.time_ms() {
                self.throttle.force(now);
            }
            true
        } else if self.viewport != before {
            event.time_ms().is_none_or(|now| self.throttle.request(now))
        } else {
            false
        };
        if render {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Resolve a screen point to an image coordinate without touching state.
    ///
    /// # Errors
    ///
    /// [`MapError::NoImageLoaded`] before an image exists, otherwise whatever
    /// [`mapper::map_tap_to_coordinate`] reports.
    pub fn map_tap_to_coordinate(&self, screen: Point) -> Result<ImageCoord, MapError> {
        let image = self.image.ok_or(MapError::NoImageLoaded)?;
        let canvas = mapper::screen_to_canvas(screen, self.canvas_origin);
        mapper::map_tap_to_coordinate(canvas, &self.viewport, &image)
    }

    // --- Zoom controls ---

    /// Zoom in one step around the container centre.
    pub fn zoom_in(&mut self) -> Vec<Action> {
        let factor = self.config.zoom_step;
        self.zoom_at_center(factor)
    }

    /// Zoom out one step around the container centre.
    pub fn zoom_out(&mut self) -> Vec<Action> {
        let factor = 1.0 / self.config.zoom_step;
        self.zoom_at_center(factor)
    }

    /// Back to zoom 1 (centred when the image fits).
    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.apply_discrete(|viewport, extent| {
            viewport.reset(extent);
        })
    }

    #[must_use]
    pub fn current_zoom_percentage(&self) -> u32 {
        self.viewport.zoom_percentage()
    }

    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.image.is_some() && self.viewport.zoom() < ZOOM_MAX
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.image.is_some() && self.viewport.zoom() > ZOOM_MIN
    }

    fn zoom_at_center(&mut self, factor: f64) -> Vec<Action> {
        self.apply_discrete(|viewport, extent| {
            viewport.zoom_by(factor, extent.container.center(), extent);
        })
    }

    fn apply_discrete(&mut self, apply: impl FnOnce(&mut Viewport, Extent)) -> Vec<Action> {
        let Some(image) = self.image else {
            return Vec::new();
        };
        let extent = self.extent(image);
        let before = self.viewport;
        apply(&mut self.viewport, extent);
        let mut actions = Vec::new();
        self.push_zoom_change(before, &mut actions);
        self.push_cursor(extent, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Host lifecycle ---

    /// Re-clamp against the container's current size.
    pub fn on_container_resize(&mut self) -> Vec<Action> {
        self.apply_discrete(|viewport, extent| {
            viewport.on_container_resize(extent);
        })
    }

    /// Animation-frame hook: emits the render the throttle held back, if any.
    pub fn on_animation_frame(&mut self, now_ms: f64) -> Vec<Action> {
        if self.image.is_some() && self.throttle.flush(now_ms) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn image(&self) -> Option<ImageSurface> {
        self.image
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn container_size(&self) -> Size {
        self.container.container_size()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.gestures.phase()
    }

    /// Canvas position of a stored coordinate's top-left corner.
    #[must_use]
    pub fn image_to_canvas(&self, coord: ImageCoord) -> Option<Point> {
        self.image.map(|_| mapper::image_to_canvas(coord, &self.viewport))
    }

    /// Image pixel under a canvas point, for hover feedback. May lie outside the image.
    #[must_use]
    pub fn canvas_to_image(&self, canvas: Point) -> Option<PixelIndex> {
        self.image.and_then(|_| mapper::canvas_to_image(canvas, &self.viewport))
    }

    // --- Helpers ---

    fn extent(&self, image: ImageSurface) -> Extent {
        Extent::new(image.size(), self.container.container_size())
    }

    fn to_canvas(&self, event: &InputEvent) -> InputEvent {
        let mut event = event.clone();
        match &mut event {
            InputEvent::ContactDown { point, .. }
            | InputEvent::ContactMove { point, .. }
            | InputEvent::ContactUp { point, .. }
            | InputEvent::Wheel { point, .. }
            | InputEvent::GestureStart { point, .. } => *point = mapper::screen_to_canvas(*point, self.canvas_origin),
            InputEvent::ContactCancel { .. }
            | InputEvent::GestureChange { .. }
            | InputEvent::GestureEnd { .. }
            | InputEvent::KeyDown { .. } => {}
        }
        event
    }

    fn push_zoom_change(&self, before: Viewport, actions: &mut Vec<Action>) {
        let percent = self.viewport.zoom_percentage();
        if percent != before.zoom_percentage() {
            actions.push(Action::ZoomChanged { percent });
        }
    }

    fn push_cursor(&mut self, extent: Extent, actions: &mut Vec<Action>) {
        let cursor = if self.gestures.phase() != Phase::Idle {
            Cursor::Grabbing
        } else if self.viewport.overflows(extent) {
            Cursor::Grab
        } else {
            Cursor::Crosshair
        };
        if self.cursor != Some(cursor) {
            self.cursor = Some(cursor);
            actions.push(Action::SetCursor(cursor));
        }
    }
}

/// Append every resolved tap to `store`, reporting the outcome after it.
pub fn record_taps(store: &mut MarkerStore, actions: Vec<Action>) -> Vec<Action> {
    let mut out = Vec::with_capacity(actions.len());
    for action in actions {
        let added = match &action {
            Action::TapResolved(coord) => Some(store.add(*coord)),
            _ => None,
        };
        out.push(action);
        match added {
            Some(Ok(id)) => out.push(Action::MarkerAdded(id)),
            Some(Err(err)) => {
                warn!(%err, "engine: tap not recorded");
                out.push(Action::MarkerRejected(err));
            }
            None => {}
        }
    }
    out
}

/// Forget every marker recorded against the previous image, anchor included.
///
/// Stored coordinates are only meaningful for the image they were picked on.
pub fn discard_markers(store: &mut MarkerStore) {
    if !store.is_empty() {
        debug!(count = store.len(), "engine: discarding markers of previous image");
    }
    *store = MarkerStore::new(store.capacity());
}

/// The full viewer engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    image: Option<HtmlImageElement>,
    css_size: Rc<Cell<Size>>,
    dpr: f64,
    pub core: EngineCore,
    pub markers: MarkerStore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Self {
        let css_size = Rc::new(Cell::new(Size::default()));
        let markers = MarkerStore::new(config.max_markers);
        Self { canvas, image: None, css_size: Rc::clone(&css_size), dpr: 1.0, core: EngineCore::new(config, css_size), markers }
    }

    /// Adopt a fully loaded image element. Markers of the previous image are dropped.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::EmptyImage`] if the element has no natural size.
    pub fn load_image(&mut self, element: HtmlImageElement) -> Result<Vec<Action>, SurfaceError> {
        let surface = ImageSurface::new(element.natural_width(), element.natural_height())?;
        self.image = Some(element);
        discard_markers(&mut self.markers);
        Ok(self.core.load_image(surface))
    }

    // --- Viewport ---

    /// Update canvas dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let css = Size::new(width_css, height_css);
        self.css_size.set(css);
        self.dpr = dpr;
        let (width, height) = render::backing_size(css, dpr);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.core.on_container_resize()
    }

    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.core.set_canvas_origin(origin);
    }

    // --- Input events ---

    /// Route an event through the core and record any resolved tap.
    pub fn handle_event(&mut self, event: &InputEvent) -> Vec<Action> {
        let actions = self.core.handle_event(event);
        record_taps(&mut self.markers, actions)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.core.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.core.zoom_out()
    }

    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.core.reset_zoom()
    }

    pub fn on_animation_frame(&mut self, now_ms: f64) -> Vec<Action> {
        self.core.on_animation_frame(now_ms)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(context) = self.canvas.get_context("2d")? else {
            return Err(JsValue::from_str("2d context unavailable"));
        };
        let ctx: CanvasRenderingContext2d = context.dyn_into()?;
        let image = self.image.as_ref().zip(self.core.image().map(|surface| surface.size()));
        render::draw(&ctx, image, &self.core.viewport(), &self.markers, self.css_size.get(), self.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn current_zoom_percentage(&self) -> u32 {
        self.core.current_zoom_percentage()
    }

    /// Resolve a screen point without recording it.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::map_tap_to_coordinate`].
    pub fn map_tap_to_coordinate(&self, screen: Point) -> Result<ImageCoord, MapError> {
        self.core.map_tap_to_coordinate(screen)
    }
}
