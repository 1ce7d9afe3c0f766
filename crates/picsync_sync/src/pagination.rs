//! Page-at-a-time loading of the local gallery.

use derive_getters::Getters;
use picsync_core::{GalleryItem, PhotoDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Paging cursor plus the items loaded so far.
///
/// `has_more` is optimistic until the total is known, then
/// `loaded < total`; an empty page always ends paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PaginationState {
    page_size: usize,
    current_offset: usize,
    total_count: Option<usize>,
    loaded_items: Vec<GalleryItem>,
    has_more: bool,
    loading: bool,
}

impl PaginationState {
    /// Nothing loaded yet. A zero page size is raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_offset: 0,
            total_count: None,
            loaded_items: Vec::new(),
            has_more: true,
            loading: false,
        }
    }

    /// Forget every loaded page.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    /// Whether a "load more" request should be honoured now.
    pub fn can_load_more(&self) -> bool {
        !self.loading && self.has_more
    }

    /// Mark a page fetch as started.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Drop photos from `page` whose ids are already loaded (or repeated in the page).
    pub fn unseen(&self, page: &[PhotoDescriptor]) -> Vec<PhotoDescriptor> {
        let mut seen: HashSet<&str> = self.loaded_items.iter().map(GalleryItem::id).collect();
        page.iter()
            .filter(|photo| seen.insert(photo.id.as_str()))
            .cloned()
            .collect()
    }

    /// Apply a fetched page.
    ///
    /// `fetched` is the raw page length the source returned and advances the
    /// offset; `items` are the de-duplicated items to append.
    pub fn apply_page(&mut self, fetched: usize, items: Vec<GalleryItem>, total: usize) {
        self.loading = false;
        self.current_offset += fetched;
        self.total_count = Some(total);

        let known: HashSet<String> = self
            .loaded_items
            .iter()
            .map(|item| item.id().to_string())
            .collect();
        self.loaded_items
            .extend(items.into_iter().filter(|item| !known.contains(item.id())));

        self.has_more = fetched > 0 && self.loaded_items.len() < total;
    }

    /// Replace loaded items in place (after reconciliation), keeping order and paging.
    pub fn replace_items(&mut self, items: Vec<GalleryItem>) {
        self.loaded_items = items;
    }

    /// Descriptors of every loaded item, in order.
    pub fn loaded_photos(&self) -> Vec<PhotoDescriptor> {
        self.loaded_items.iter().map(|item| item.photo.clone()).collect()
    }

    /// Loaded item with `id`.
    pub fn item(&self, id: &str) -> Option<&GalleryItem> {
        self.loaded_items.iter().find(|item| item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> PhotoDescriptor {
        PhotoDescriptor::new(id, id, format!("{}.jpg", id), 1)
    }

    #[test]
    fn optimistic_until_total_known() {
        let state = PaginationState::new(2);
        assert!(*state.has_more());
        assert!(state.can_load_more());
        assert_eq!(*state.total_count(), None);
    }

    #[test]
    fn empty_page_ends_paging() {
        let mut state = PaginationState::new(2);
        state.apply_page(0, Vec::new(), 10);
        assert!(!*state.has_more());
    }

    #[test]
    fn unseen_filters_repeats_within_page() {
        let state = PaginationState::new(5);
        let unseen = state.unseen(&[photo("a"), photo("a"), photo("b")]);
        assert_eq!(unseen.len(), 2);
    }

    #[test]
    fn loading_blocks_load_more() {
        let mut state = PaginationState::new(2);
        state.begin_load();
        assert!(!state.can_load_more());
        state.apply_page(2, vec![], 4);
        assert!(state.can_load_more());
    }
}
