//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::ResourceKind;

/// Which popup currently owns the keyboard
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PopupKind {
    Prompt,
    Confirm,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(ResourceKind),
    NextTab,
    PrevTab,

    // List navigation
    SelectUp,
    SelectDown,

    // List actions
    Reload,
    Add,
    Edit,
    Delete,
    Toggle,
    DismissError,

    // Prompt popup
    PopupChar(char),
    PopupBackspace,
    PopupSubmit,
    PopupCancel,

    // Confirm popup
    Confirm(bool),

    // Help
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

impl UiEvent {
    /// Events that answer or edit the popup on screen
    pub fn is_popup_event(&self) -> bool {
        matches!(
            self,
            UiEvent::PopupChar(_)
                | UiEvent::PopupBackspace
                | UiEvent::PopupSubmit
                | UiEvent::PopupCancel
                | UiEvent::Confirm(_)
        )
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    popup: Option<PopupKind>,
    show_help: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Popups take every key
    match popup {
        Some(PopupKind::Prompt) => {
            return match key.code {
                KeyCode::Esc => Some(UiEvent::PopupCancel),
                KeyCode::Enter => Some(UiEvent::PopupSubmit),
                KeyCode::Backspace => Some(UiEvent::PopupBackspace),
                KeyCode::Char(c) => Some(UiEvent::PopupChar(c)),
                _ => None,
            };
        }
        Some(PopupKind::Confirm) => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    Some(UiEvent::Confirm(true))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(UiEvent::Confirm(false))
                }
                _ => None,
            };
        }
        None => {}
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => Some(UiEvent::SwitchTab(ResourceKind::Comments)),
        KeyCode::Char('2') => Some(UiEvent::SwitchTab(ResourceKind::Posts)),
        KeyCode::Char('3') => Some(UiEvent::SwitchTab(ResourceKind::Recipes)),
        KeyCode::Char('4') => Some(UiEvent::SwitchTab(ResourceKind::Todos)),
        KeyCode::Tab => Some(UiEvent::NextTab),
        KeyCode::BackTab => Some(UiEvent::PrevTab),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectDown),
        KeyCode::Char('r') => Some(UiEvent::Reload),
        KeyCode::Char('a') => Some(UiEvent::Add),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::Edit),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::Delete),
        KeyCode::Char(' ') | KeyCode::Char('t') => Some(UiEvent::Toggle),
        KeyCode::Char('x') => Some(UiEvent::DismissError),
        _ => None,
    }
}
