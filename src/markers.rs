//! Marker store: the ordered list of recorded image coordinates.
//!
//! Markers are kept in user order (drag-reorder moves them). At most one
//! marker is the *anchor*: it cannot be removed or renamed and survives [`MarkerStore::clear`].

#[cfg(test)]
#[path = "markers_test.rs"]
mod markers_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::consts::MAX_MARKERS;
use crate::error::StoreError;
use crate::geometry::Point;
use crate::mapper::{ImageCoord, image_to_canvas_center};
use crate::viewport::Viewport;

pub type MarkerId = Uuid;

/// One recorded coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub label: String,
    #[serde(flatten)]
    pub coord: ImageCoord,
    #[serde(default)]
    pub anchor: bool,
}

#[derive(Debug, Clone)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    max: usize,
    next_number: usize,
}

impl Default for MarkerStore {
    fn default() -> Self {
        Self::new(MAX_MARKERS)
    }
}

impl MarkerStore {
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { markers: Vec::new(), max, next_number: 1 }
    }

    /// Append a marker labelled `Point N`, numbering from 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Full`] at capacity.
    pub fn add(&mut self, coord: ImageCoord) -> Result<MarkerId, StoreError> {
        let label = format!("Point {}", self.next_number);
        let id = self.push(coord, label, false)?;
        self.next_number += 1;
        Ok(id)
    }

    /// Append a marker with an explicit label.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Full`] at capacity.
    pub fn add_labelled(&mut self, coord: ImageCoord, label: impl Into<String>) -> Result<MarkerId, StoreError> {
        self.push(coord, label.into(), false)
    }

    /// Append the anchor marker.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AnchorExists`] if one is already present, or
    /// [`StoreError::Full`] at capacity.
    pub fn add_anchor(&mut self, coord: ImageCoord, label: impl Into<String>) -> Result<MarkerId, StoreError> {
        if self.anchor().is_some() {
            return Err(StoreError::AnchorExists);
        }
        self.push(coord, label.into(), true)
    }

    fn push(&mut self, coord: ImageCoord, label: String, anchor: bool) -> Result<MarkerId, StoreError> {
        if self.markers.len() >= self.max {
            debug!(max = self.max, "markers: store full");
            return Err(StoreError::Full { max: self.max });
        }
        let id = Uuid::new_v4();
        debug!(%id, %coord, %label, "markers: added");
        self.markers.push(Marker { id, label, coord, anchor });
        Ok(id)
    }

    /// Remove a marker.
    ///
    /// # Errors
    ///
    /// [`StoreError::AnchorLocked`] for the anchor, [`StoreError::NotFound`]
    /// for an unknown id.
    pub fn remove(&mut self, id: MarkerId) -> Result<Marker, StoreError> {
        let index = self.index_of(id)?;
        if self.markers[index].anchor {
            return Err(StoreError::AnchorLocked);
        }
        Ok(self.markers.remove(index))
    }

    /// Replace a marker's label.
    ///
    /// # Errors
    ///
    /// [`StoreError::AnchorLocked`] for the anchor, [`StoreError::NotFound`]
    /// for an unknown id.
    pub fn rename(&mut self, id: MarkerId, label: impl Into<String>) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        if self.markers[index].anchor {
            return Err(StoreError::AnchorLocked);
        }
        self.markers[index].label = label.into();
        Ok(())
    }

    /// Move the marker at `from` so it ends up at index `to`.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexOutOfRange`] if either index is past the end.
    pub fn move_marker(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        let len = self.markers.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }
        let marker = self.markers.remove(from);
        self.markers.insert(to, marker);
        Ok(())
    }

    /// Remove every marker except the anchor.
    pub fn clear(&mut self) {
        let before = self.markers.len();
        self.markers.retain(|m| m.anchor);
        info!(removed = before - self.markers.len(), "markers: cleared");
    }

    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn anchor(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.anchor)
    }

    /// Markers in list order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.markers.len() >= self.max
    }

    /// Canvas position of each marker's pixel centre under `viewport`.
    pub fn projected<'a>(&'a self, viewport: &'a Viewport) -> impl Iterator<Item = (&'a Marker, Point)> + 'a {
        self.markers.iter().map(move |m| (m, image_to_canvas_center(m.coord, viewport)))
    }

    // --- Export ---

    /// One `x,y` line per marker.
    #[must_use]
    pub fn export_coordinates(&self) -> String {
        self.markers.iter().map(|m| format!("{}\n", m.coord)).collect()
    }

    /// One label per line.
    #[must_use]
    pub fn export_labels(&self) -> String {
        self.markers.iter().map(|m| format!("{}\n", m.label)).collect()
    }

    /// JSON array of `{id, label, x, y, anchor}` records.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.markers)
    }

    fn index_of(&self, id: MarkerId) -> Result<usize, StoreError> {
        self.markers.iter().position(|m| m.id == id).ok_or(StoreError::NotFound(id))
    }
}
