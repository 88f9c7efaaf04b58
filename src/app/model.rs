//! Application model: selection, filter mode and view flags.
//!
//! `App` owns the catalog and the cursor over its filtered view. Playback
//! state lives in the controller; this model only tracks what the UI needs
//! beyond it.

use crate::library::Catalog;

pub struct App {
    pub catalog: Catalog,

    /// Cursor position as an index into the catalog's underlying order.
    pub selected: usize,

    pub follow_playback: bool,
    pub pending_follow_index: Option<usize>,

    pub filter_mode: bool,
    /// Compact (mini player) layout.
    pub compact: bool,
    pub show_viz: bool,

    pub current_dir: Option<String>,
    /// Transient status-line text (e.g. "playlist saved").
    pub status_message: Option<String>,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selected: 0,
            follow_playback: true,
            pending_follow_index: None,
            filter_mode: false,
            compact: false,
            show_viz: true,
            current_dir: None,
            status_message: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.catalog.is_empty()
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback and clear any pending follow index.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
        self.pending_follow_index = None;
    }

    /// Set an index to follow once playback information becomes available.
    pub fn set_pending_follow_index(&mut self, idx: usize) {
        self.pending_follow_index = Some(idx);
    }

    pub fn clear_pending_follow_index(&mut self) {
        self.pending_follow_index = None;
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn toggle_compact(&mut self) {
        self.compact = !self.compact;
    }

    pub fn toggle_viz(&mut self) {
        self.show_viz = !self.show_viz;
    }

    /// Set the cursor and make sure it is part of the visible view.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Move the cursor to the next visible track, wrapping around.
    pub fn select_next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move the cursor to the previous visible track, wrapping around.
    pub fn select_prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let visible = self.catalog.visible();
        if visible.is_empty() {
            return None;
        }
        match visible.iter().position(|&i| i == current) {
            Some(p) => Some(visible[(p + 1) % visible.len()]),
            None => Some(visible[0]),
        }
    }

    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let visible = self.catalog.visible();
        if visible.is_empty() {
            return None;
        }
        match visible.iter().position(|&i| i == current) {
            Some(0) | None => Some(visible[visible.len() - 1]),
            Some(p) => Some(visible[p - 1]),
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback_off();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.catalog.set_filter("");
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut query = self.catalog.filter().to_string();
        query.push(c);
        self.catalog.set_filter(&query);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        let mut query = self.catalog.filter().to_string();
        query.pop();
        self.catalog.set_filter(&query);
        self.ensure_selected_visible();
    }

    /// Keep the cursor inside the current view, falling back to the first
    /// visible track.
    pub fn ensure_selected_visible(&mut self) {
        let visible = self.catalog.visible();
        if visible.is_empty() {
            self.selected = 0;
            return;
        }
        if !visible.contains(&self.selected) {
            self.selected = visible[0];
        }
    }
}
