//! Consumer-side selection state: active category, search term, focused item.
//!
//! Pure state with no I/O, constructed fresh per consumer session and passed
//! by reference to the rendering layer.

use serde::{Deserialize, Serialize};

use super::types::ALL_CATEGORIES;

/// Tracks what the consumer is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    active_category: String,
    search_term: String,
    focused_item: Option<String>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    /// Fresh state: all categories visible, no search, nothing focused.
    pub fn new() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
            focused_item: None,
        }
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn focused_item(&self) -> Option<&str> {
        self.focused_item.as_deref()
    }

    /// Switch category. Clears the search term and focused item: a category
    /// change always starts from a clean list.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.active_category = category.into();
        self.search_term.clear();
        self.focused_item = None;
    }

    /// Update the search term, leaving category and focus untouched.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Focus an item for detail rendering, or clear the focus with `None`.
    pub fn focus(&mut self, item_id: Option<String>) {
        self.focused_item = item_id;
    }
}
