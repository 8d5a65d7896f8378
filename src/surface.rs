//! The loaded raster image and the live container-size query.
//!
//! [`ImageSurface`] only records what the transform math needs: the native
//! pixel dimensions, fixed for the lifetime of the image. Pixel data stays
//! with the host (an `HtmlImageElement` in the browser).

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::error::SurfaceError;
use crate::geometry::Size;

/// Native dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSurface {
    width: u32,
    height: u32,
}

impl ImageSurface {
    /// Create a surface for an image of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::EmptyImage`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyImage { width, height });
        }
        Ok(Self { width, height })
    }

    /// Decode user-supplied image bytes and adopt their dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Decode`] if the bytes are not a supported image,
    /// or [`SurfaceError::EmptyImage`] if the decoded image has no pixels.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SurfaceError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::new(decoded.width(), decoded.height())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native size as floating CSS pixels at zoom 1.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Live query for the hosting container's current size.
///
/// Implementations must answer with the size at call time; the engine never
/// caches the answer beyond a single operation.
pub trait ContainerSize {
    fn container_size(&self) -> Size;
}

impl ContainerSize for Size {
    fn container_size(&self) -> Size {
        *self
    }
}

/// A container size shared with the host, updated in place on resize.
impl ContainerSize for Rc<Cell<Size>> {
    fn container_size(&self) -> Size {
        self.get()
    }
}
