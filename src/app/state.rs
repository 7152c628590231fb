//! App state - pure data structure with no I/O logic

use std::collections::{HashSet, VecDeque};

use crate::input::InputRequest;
use crate::messages::render::{PageView, PopupView, RenderState};
use crate::messages::ui_events::PopupKind;
use crate::models::ResourceKind;

/// Main application state - pure data, no I/O
pub struct AppState {
    // Tab navigation
    pub active_tab: ResourceKind,
    /// Tabs that have been shown at least once (and so loaded)
    pub activated: HashSet<ResourceKind>,

    // Selected row per tab, indexed by `ResourceKind::index`
    pub selected: [usize; 4],

    // Questions waiting for the user; the front one is on screen
    pub pending_input: VecDeque<InputRequest>,
    pub prompt_buffer: String,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ResourceKind::default())
    }
}

impl AppState {
    pub fn new(initial_tab: ResourceKind) -> Self {
        AppState {
            active_tab: initial_tab,
            activated: HashSet::new(),
            selected: [0; 4],
            pending_input: VecDeque::new(),
            prompt_buffer: String::new(),
            show_help: false,
        }
    }

    /// Selection of the active tab clamped to `len` rows
    pub fn selected_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.selected[self.active_tab.index()].min(len - 1))
        }
    }

    /// Kind of the popup currently owning the keyboard
    pub fn popup_kind(&self) -> Option<PopupKind> {
        self.pending_input.front().map(|request| match request {
            InputRequest::Prompt { .. } => PopupKind::Prompt,
            InputRequest::Confirm { .. } => PopupKind::Confirm,
        })
    }

    /// Popup for the front question, if any
    pub fn popup_view(&self) -> Option<PopupView> {
        self.pending_input.front().map(|request| match request {
            InputRequest::Prompt { message, .. } => PopupView {
                kind: PopupKind::Prompt,
                message: message.clone(),
                buffer: self.prompt_buffer.clone(),
            },
            InputRequest::Confirm { message, .. } => PopupView {
                kind: PopupKind::Confirm,
                message: message.clone(),
                buffer: String::new(),
            },
        })
    }

    /// Convert state plus the active page to RenderState for UI
    pub fn to_render_state(&self, page: PageView, busy_tabs: Vec<ResourceKind>) -> RenderState {
        let selected = self.selected_index(page.rows.len()).unwrap_or(0);
        RenderState {
            active_tab: self.active_tab,
            rows: page.rows,
            selected,
            is_loading: page.is_loading,
            error: page.error,
            last_loaded: page.last_loaded,
            busy_tabs,
            popup: self.popup_view(),
            show_help: self.show_help,
        }
    }
}
