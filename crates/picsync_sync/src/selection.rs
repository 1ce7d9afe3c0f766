//! Batch-action selection.

use picsync_core::GalleryItem;
use serde::{Deserialize, Serialize};

/// What a selection will do when acted on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum SelectionMode {
    /// Members are local photos not on the server yet
    #[display("upload")]
    Upload,
    /// Members are photos the server already holds
    #[display("delete")]
    Delete,
}

impl SelectionMode {
    /// Mode an item would seed.
    pub fn for_item(item: &GalleryItem) -> Self {
        if item.is_uploaded {
            Self::Delete
        } else {
            Self::Upload
        }
    }
}

/// Ordered set of selected item ids.
///
/// The first member fixes the mode; items of the other mode are ignored.
/// An empty set means selection mode is off.
///
/// # Examples
///
/// ```
/// use picsync_core::{GalleryItem, PhotoDescriptor};
/// use picsync_sync::{SelectionMode, SelectionSet};
///
/// let on_server = GalleryItem::uploaded(PhotoDescriptor::new("1", "/a", "a.jpg", 1), "r1");
/// let local_only = GalleryItem::not_uploaded(PhotoDescriptor::new("2", "/b", "b.jpg", 1));
///
/// let mut selection = SelectionSet::new();
/// assert!(selection.toggle(&on_server));
/// assert!(!selection.toggle(&local_only));
/// assert_eq!(selection.mode(), Some(SelectionMode::Delete));
/// assert_eq!(selection.ids(), ["1".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: Vec<String>,
    mode: Option<SelectionMode>,
}

impl SelectionSet {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode, `None` when nothing is selected.
    pub fn mode(&self) -> Option<SelectionMode> {
        self.mode
    }

    /// Whether selection mode is on.
    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Whether `item` could join the current selection.
    pub fn accepts(&self, item: &GalleryItem) -> bool {
        self.mode.is_none_or(|mode| mode == SelectionMode::for_item(item))
    }

    /// Add `item` if compatible. Returns whether the set changed.
    pub fn insert(&mut self, item: &GalleryItem) -> bool {
        if !self.accepts(item) || self.contains(item.id()) {
            return false;
        }
        if self.mode.is_none() {
            self.mode = Some(SelectionMode::for_item(item));
        }
        self.ids.push(item.id().to_string());
        true
    }

    /// Add or remove `item`. Incompatible items are ignored.
    ///
    /// Returns whether the set changed. Removing the last member clears the mode.
    pub fn toggle(&mut self, item: &GalleryItem) -> bool {
        if !self.accepts(item) {
            return false;
        }
        if self.contains(item.id()) {
            self.ids.retain(|id| id != item.id());
            if self.ids.is_empty() {
                self.mode = None;
            }
            true
        } else {
            self.insert(item)
        }
    }

    /// Deselect everything and leave selection mode.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.mode = None;
    }
}
