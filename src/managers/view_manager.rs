//! View state for the listing screen: search text, current page, the
//! add/edit form, the delete confirmation and the success flash.
//!
//! Nothing here is persisted; a fresh `ViewState` is built on every start.

use std::time::Instant;

use crate::managers::query_engine;
use crate::types::leaf::{Leaf, LeafFields};
use crate::types::query::QueryPage;
use crate::types::view::{DeleteConfirmation, FlashMessage, FormMode};

/// Parses the listing route's `page` query parameter. Anything that is not a
/// positive integer falls back to page 1.
pub fn parse_page_param(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

#[derive(Debug, Clone)]
pub struct ViewState {
    search: String,
    page: usize,
    page_size: usize,
    form_mode: FormMode,
    form: LeafFields,
    delete: DeleteConfirmation,
    flash: Option<FlashMessage>,
}

impl ViewState {
    pub fn new(initial_page: usize, page_size: usize) -> Self {
        Self {
            search: String::new(),
            page: initial_page.max(1),
            page_size,
            form_mode: FormMode::Closed,
            form: LeafFields::default(),
            delete: DeleteConfirmation::Idle,
            flash: None,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changing the search text always goes back to page 1.
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Moves forward unless already on the last page.
    pub fn next_page(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    /// Moves back unless already on the first page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Runs the query for the current search and page.
    pub fn current_page(&self, leaves: &[Leaf]) -> QueryPage {
        query_engine::query(leaves, &self.search, self.page, self.page_size)
    }

    // ─── Add / edit form ───

    pub fn form_mode(&self) -> FormMode {
        self.form_mode
    }

    pub fn form(&self) -> &LeafFields {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LeafFields {
        &mut self.form
    }

    pub fn begin_create(&mut self) {
        self.form = LeafFields::default();
        self.form_mode = FormMode::Creating;
    }

    /// Opens the form pre-filled with a snapshot of `leaf`.
    pub fn begin_edit(&mut self, leaf: &Leaf) {
        self.form = LeafFields::from_leaf(leaf);
        self.form_mode = FormMode::Editing(leaf.id);
    }

    /// Closes the form and clears its contents.
    pub fn finish_edit(&mut self) {
        self.form = LeafFields::default();
        self.form_mode = FormMode::Closed;
    }

    // ─── Delete confirmation ───

    pub fn delete_confirmation(&self) -> DeleteConfirmation {
        self.delete
    }

    pub fn request_delete(&mut self, id: u64) {
        self.delete = DeleteConfirmation::Pending(id);
    }

    /// Returns the pending target and clears it.
    pub fn confirm_delete(&mut self) -> Option<u64> {
        match std::mem::take(&mut self.delete) {
            DeleteConfirmation::Pending(id) => Some(id),
            DeleteConfirmation::Idle => None,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete = DeleteConfirmation::Idle;
    }

    // ─── Flash ───

    pub fn flash(&mut self, text: &str) {
        self.flash_at(text, Instant::now());
    }

    pub fn flash_at(&mut self, text: &str, now: Instant) {
        self.flash = Some(FlashMessage {
            text: text.to_string(),
            shown_at: now,
        });
    }

    /// The success message, while it is still fresh.
    pub fn flash_message(&self, now: Instant) -> Option<&str> {
        self.flash
            .as_ref()
            .filter(|flash| flash.is_fresh(now))
            .map(|flash| flash.text.as_str())
    }
}
