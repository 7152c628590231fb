//! Render state - data structure sent from App layer to UI for rendering

use chrono::{DateTime, Utc};

use crate::messages::ui_events::PopupKind;
use crate::models::{FlagField, Item, ItemId, Payload, ResourceKind};
use crate::store::ListState;

/// One list row, already flattened to text
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: ItemId,
    pub title: String,
    pub detail: String,
    /// Completion state for resources that have one
    pub flag: Option<bool>,
}

impl RowView {
    pub fn from_item<P: Payload>(item: &Item<P>) -> Self {
        RowView {
            id: item.id,
            title: item.payload.title(),
            detail: item.payload.detail(),
            flag: item.payload.flag(FlagField::Completed),
        }
    }
}

/// What the UI needs from one store
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub rows: Vec<RowView>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_loaded: Option<DateTime<Utc>>,
}

impl PageView {
    pub fn from_state<P: Payload>(state: &ListState<P>) -> Self {
        PageView {
            rows: state.items.iter().map(RowView::from_item).collect(),
            is_loading: state.is_loading(),
            error: state.error.map(|e| e.to_string()),
            last_loaded: state.last_loaded,
        }
    }
}

/// Prompt or confirmation popup
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub kind: PopupKind,
    pub message: String,
    pub buffer: String,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub active_tab: ResourceKind,

    // Active list
    pub rows: Vec<RowView>,
    pub selected: usize,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_loaded: Option<DateTime<Utc>>,

    // Tabs that have something in flight
    pub busy_tabs: Vec<ResourceKind>,

    // Popups
    pub popup: Option<PopupView>,
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            active_tab: ResourceKind::default(),
            rows: Vec::new(),
            selected: 0,
            is_loading: false,
            error: None,
            last_loaded: None,
            busy_tabs: Vec::new(),
            popup: None,
            show_help: false,
        }
    }
}

impl RenderState {
    pub fn popup_kind(&self) -> Option<PopupKind> {
        self.popup.as_ref().map(|p| p.kind)
    }
}
