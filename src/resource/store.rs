//! Resource Store
//!
//! Authoritative in-memory list for one resource type plus the filtered view
//! shown in the table. The view is kept as indices into the list, so it is
//! always a subsequence of it and filtering never touches the list itself.

use super::Resource;

/// Indices of `items` whose name contains `term` (case-insensitive).
/// An empty term selects everything.
pub fn text_filter<R: Resource>(items: &[R], term: &str) -> Vec<usize> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return (0..items.len()).collect();
    }

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.name().to_lowercase().contains(&term))
        .map(|(idx, _)| idx)
        .collect()
}

#[derive(Debug, Clone)]
pub struct ResourceStore<R> {
    items: Vec<R>,
    filtered: Vec<usize>,
    filter_text: String,
    /// Cursor into the filtered view
    pub selected: usize,
    loaded: bool,
}

impl<R: Resource> Default for ResourceStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            filter_text: String::new(),
            selected: 0,
            loaded: false,
        }
    }

    /// Replace the authoritative list with a freshly loaded one.
    ///
    /// The current search term is re-applied, so a term typed while the load
    /// was in flight still holds afterwards.
    pub fn replace(&mut self, items: Vec<R>) {
        let prev_selected_id = self.selected_item().map(Resource::id);

        self.items = items;
        self.loaded = true;
        self.filtered = text_filter(&self.items, &self.filter_text);

        // Keep the cursor on the same entity when it survived the reload
        self.selected = prev_selected_id
            .and_then(|id| self.filtered_items().position(|item| item.id() == id))
            .unwrap_or(self.selected);
        self.clamp_selection();
    }

    /// Recompute the filtered view for `term`. Pure; never re-fetches.
    pub fn apply_text_filter(&mut self, term: &str) {
        self.filter_text = term.to_string();
        self.filtered = text_filter(&self.items, &self.filter_text);
        self.clamp_selection();
    }

    pub fn clear_text_filter(&mut self) {
        self.apply_text_filter("");
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn filtered_items(&self) -> impl Iterator<Item = &R> + '_ {
        self.filtered.iter().filter_map(|&idx| self.items.get(idx))
    }

    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn get_filtered(&self, position: usize) -> Option<&R> {
        self.filtered
            .get(position)
            .and_then(|&idx| self.items.get(idx))
    }

    pub fn find(&self, id: i64) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(Resource::id).collect()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn selected_item(&self) -> Option<&R> {
        self.get_filtered(self.selected)
    }

    pub fn next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered.len() - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    pub fn page_down(&mut self, page_size: usize) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + page_size).min(self.filtered.len() - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }
}
