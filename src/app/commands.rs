//! Command handlers - state transitions for UI events that need no I/O

use crate::app::AppState;
use crate::input::InputRequest;
use crate::models::ResourceKind;

impl AppState {
    // ========================
    // Navigation
    // ========================

    /// Show `kind`; true when this is its first activation
    pub fn switch_tab(&mut self, kind: ResourceKind) -> bool {
        self.active_tab = kind;
        self.activated.insert(kind)
    }

    pub fn select_up(&mut self) {
        let slot = &mut self.selected[self.active_tab.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn select_down(&mut self, len: usize) {
        let slot = &mut self.selected[self.active_tab.index()];
        if *slot + 1 < len {
            *slot += 1;
        }
    }

    // ========================
    // Input popups
    // ========================

    pub fn push_request(&mut self, request: InputRequest) {
        self.pending_input.push_back(request);
        if self.pending_input.len() == 1 {
            self.reset_buffer();
        }
    }

    pub fn popup_char(&mut self, c: char) {
        if matches!(self.pending_input.front(), Some(InputRequest::Prompt { .. })) {
            self.prompt_buffer.push(c);
        }
    }

    pub fn popup_backspace(&mut self) {
        self.prompt_buffer.pop();
    }

    pub fn submit_prompt(&mut self) {
        let answer = std::mem::take(&mut self.prompt_buffer);
        self.answer_prompt(Some(answer));
    }

    pub fn cancel_prompt(&mut self) {
        self.answer_prompt(None);
    }

    pub fn answer_confirm(&mut self, yes: bool) {
        if let Some(InputRequest::Confirm { reply, .. }) = self.pop_if(|r| {
            matches!(r, InputRequest::Confirm { .. })
        }) {
            let _ = reply.send(yes);
        }
    }

    fn answer_prompt(&mut self, answer: Option<String>) {
        if let Some(InputRequest::Prompt { reply, .. }) = self.pop_if(|r| {
            matches!(r, InputRequest::Prompt { .. })
        }) {
            let _ = reply.send(answer);
        }
    }

    fn pop_if(&mut self, pred: impl Fn(&InputRequest) -> bool) -> Option<InputRequest> {
        if !self.pending_input.front().is_some_and(pred) {
            return None;
        }
        let request = self.pending_input.pop_front();
        self.reset_buffer();
        request
    }

    /// Pre-fill the prompt buffer from the front question's default
    fn reset_buffer(&mut self) {
        self.prompt_buffer = match self.pending_input.front() {
            Some(InputRequest::Prompt { default, .. }) => default.clone().unwrap_or_default(),
            _ => String::new(),
        };
    }

    // ========================
    // Help
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
