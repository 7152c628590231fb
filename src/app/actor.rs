//! App actor - message loop processing UI events, input requests and store changes

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::app::stores::Stores;
use crate::input::{ChannelInput, InputRequest};
use crate::messages::{RenderState, UiEvent};
use crate::models::{ItemId, ResourceKind};

/// App actor that owns the stores and turns UI events into store actions
pub struct AppActor {
    state: AppState,
    stores: Stores,
    input: ChannelInput,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    /// `input` must feed the `input_rx` later passed to [`AppActor::run`]
    pub fn new(
        stores: Stores,
        input: ChannelInput,
        initial_tab: ResourceKind,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(initial_tab),
            stores,
            input,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut input_rx: mpsc::UnboundedReceiver<InputRequest>,
    ) {
        let mut comments_rx = self.stores.comments.subscribe();
        let mut posts_rx = self.stores.posts.subscribe();
        let mut recipes_rx = self.stores.recipes.subscribe();
        let mut todos_rx = self.stores.todos.subscribe();

        self.activate(self.state.active_tab);
        self.render();

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    match event {
                        Some(event) => {
                            if self.handle_ui_event(event) {
                                tracing::info!("Quit requested");
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Some(request) = input_rx.recv() => {
                    self.state.push_request(request);
                }
                Ok(()) = comments_rx.changed() => {}
                Ok(()) = posts_rx.changed() => {}
                Ok(()) = recipes_rx.changed() => {}
                Ok(()) = todos_rx.changed() => {}
            }
            self.render();
        }
    }

    fn render(&self) {
        let kind = self.state.active_tab;
        let render = self
            .state
            .to_render_state(self.stores.page(kind), self.stores.busy());
        let _ = self.render_tx.send(render);
    }

    /// Show a tab, loading it the first time
    fn activate(&mut self, kind: ResourceKind) {
        if self.state.switch_tab(kind) {
            tracing::info!(kind = %kind, "First activation, loading");
            self.stores.spawn_load(kind);
        }
    }

    fn selected_id(&self) -> Option<ItemId> {
        let ids = self.stores.ids(self.state.active_tab);
        self.state.selected_index(ids.len()).map(|i| ids[i])
    }

    /// Handle a UI event, returns true if quit was requested
    ///
    /// The UI routes keys by the last render it received, which can lag
    /// behind a question that already reached this actor. While a question
    /// is waiting, only popup events and quit get through.
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let kind = self.state.active_tab;

        if self.state.popup_kind().is_some()
            && !event.is_popup_event()
            && event != UiEvent::Quit
        {
            tracing::debug!(?event, "Popup open, event dropped");
            return false;
        }

        match event {
            // Tabs
            UiEvent::SwitchTab(tab) => self.activate(tab),
            UiEvent::NextTab => self.activate(kind.next()),
            UiEvent::PrevTab => self.activate(kind.prev()),

            // Selection
            UiEvent::SelectUp => self.state.select_up(),
            UiEvent::SelectDown => {
                let len = self.stores.ids(kind).len();
                self.state.select_down(len);
            }

            // List actions
            UiEvent::Reload => self.stores.spawn_load(kind),
            UiEvent::Add => self.stores.spawn_add(kind, self.input.clone()),
            UiEvent::Edit => {
                if let Some(id) = self.selected_id() {
                    self.stores.spawn_edit(kind, id, self.input.clone());
                }
            }
            UiEvent::Delete => {
                if let Some(id) = self.selected_id() {
                    self.stores.spawn_remove(kind, id, self.input.clone());
                }
            }
            UiEvent::Toggle => {
                if let Some(id) = self.selected_id() {
                    self.stores.toggle(kind, id);
                }
            }
            UiEvent::DismissError => self.stores.clear_error(kind),

            // Popups
            UiEvent::PopupChar(c) => self.state.popup_char(c),
            UiEvent::PopupBackspace => self.state.popup_backspace(),
            UiEvent::PopupSubmit => self.state.submit_prompt(),
            UiEvent::PopupCancel => self.state.cancel_prompt(),
            UiEvent::Confirm(yes) => self.state.answer_confirm(yes),

            // Help
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::models::{Comment, Item, Post, Recipe, Todo};
    use crate::store::fake::{FakeRemote, Op};
    use crate::store::{ListStore, RemoteCollection};

    fn store<P: crate::models::Payload>(items: Vec<Item<P>>) -> (Arc<FakeRemote<P>>, ListStore<P>) {
        let remote = Arc::new(FakeRemote::with_items(items));
        let store = ListStore::new(remote.clone() as Arc<dyn RemoteCollection<P>>);
        (remote, store)
    }

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        comments: Arc<FakeRemote<Comment>>,
        todos: Arc<FakeRemote<Todo>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Harness {
        fn start() -> Self {
            let (comments, comment_store) = store(vec![Item::new(
                1,
                Comment {
                    body: "hi".into(),
                    post_id: 1,
                },
            )]);
            let (_, post_store) = store::<Post>(vec![]);
            let (_, recipe_store) = store::<Recipe>(vec![]);
            let (todos, todo_store) = store(vec![Item::new(
                5,
                Todo {
                    todo: "walk".into(),
                    completed: false,
                },
            )]);
            let stores = Stores {
                comments: comment_store,
                posts: post_store,
                recipes: recipe_store,
                todos: todo_store,
            };

            let (input, input_rx) = ChannelInput::channel();
            let (ui_tx, ui_rx) = mpsc::unbounded_channel();
            let (render_tx, render_rx) = mpsc::unbounded_channel();
            let actor = AppActor::new(stores, input, ResourceKind::Comments, render_tx);
            let handle = tokio::spawn(actor.run(ui_rx, input_rx));

            Harness {
                ui_tx,
                render_rx,
                comments,
                todos,
                handle,
            }
        }

        fn send(&self, event: UiEvent) {
            self.ui_tx.send(event).unwrap();
        }

        async fn wait_for(&mut self, pred: impl Fn(&RenderState) -> bool) -> RenderState {
            tokio::time::timeout(Duration::from_secs(2), async {
                loop {
                    let state = self.render_rx.recv().await.unwrap();
                    if pred(&state) {
                        return state;
                    }
                }
            })
            .await
            .unwrap()
        }

        async fn quit(self) {
            self.ui_tx.send(UiEvent::Quit).unwrap();
            self.handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_initial_tab_loads_on_start() {
        let mut h = Harness::start();
        let state = h.wait_for(|s| !s.rows.is_empty()).await;
        assert_eq!(state.active_tab, ResourceKind::Comments);
        assert_eq!(state.rows[0].title, "hi");
        assert_eq!(h.comments.calls(), vec!["fetch"]);
        h.quit().await;
    }

    #[tokio::test]
    async fn test_add_through_prompt_popup() {
        let mut h = Harness::start();
        h.wait_for(|s| !s.rows.is_empty() && !s.is_loading).await;

        h.send(UiEvent::Add);
        let state = h.wait_for(|s| s.popup.is_some()).await;
        assert_eq!(state.popup.unwrap().message, "Enter your comment:");

        for c in "new".chars() {
            h.send(UiEvent::PopupChar(c));
        }
        h.send(UiEvent::PopupSubmit);

        let state = h.wait_for(|s| s.rows.len() == 2 && !s.is_loading).await;
        assert_eq!(state.rows[0].title, "new");
        assert!(state.popup.is_none());
        h.quit().await;
    }

    #[tokio::test]
    async fn test_cancelled_delete_keeps_row() {
        let mut h = Harness::start();
        h.wait_for(|s| !s.rows.is_empty() && !s.is_loading).await;

        h.send(UiEvent::Delete);
        let state = h.wait_for(|s| s.popup.is_some()).await;
        assert_eq!(
            state.popup.unwrap().message,
            "Are you sure you want to delete this comment?"
        );
        h.send(UiEvent::Confirm(false));

        let state = h.wait_for(|s| s.popup.is_none()).await;
        assert_eq!(state.rows.len(), 1);
        assert_eq!(h.comments.calls(), vec!["fetch"]);
        h.quit().await;
    }

    #[tokio::test]
    async fn test_failed_delete_shows_error_until_dismissed() {
        let mut h = Harness::start();
        h.wait_for(|s| !s.rows.is_empty() && !s.is_loading).await;
        h.comments.fail_on(Op::Delete);

        h.send(UiEvent::Delete);
        h.wait_for(|s| s.popup.is_some()).await;
        h.send(UiEvent::Confirm(true));

        let state = h.wait_for(|s| s.error.is_some()).await;
        assert_eq!(state.error.as_deref(), Some("Failed to delete comment."));
        assert_eq!(state.rows.len(), 1);

        h.send(UiEvent::DismissError);
        h.wait_for(|s| s.error.is_none()).await;
        h.quit().await;
    }

    #[tokio::test]
    async fn test_toggle_on_todos_tab() {
        let mut h = Harness::start();
        h.send(UiEvent::SwitchTab(ResourceKind::Todos));
        h.wait_for(|s| s.active_tab == ResourceKind::Todos && !s.rows.is_empty()).await;
        h.todos.fail_on(Op::SetFlag);

        h.send(UiEvent::Toggle);
        let state = h.wait_for(|s| s.rows.first().and_then(|r| r.flag) == Some(true)).await;
        assert!(state.error.is_none());
        h.quit().await;
    }

    #[tokio::test]
    async fn test_list_actions_dropped_while_question_waits() {
        let (comments, comment_store) = store(vec![Item::new(
            1,
            Comment {
                body: "hi".into(),
                post_id: 1,
            },
        )]);
        comment_store.load().await.unwrap();
        let (_, post_store) = store::<Post>(vec![]);
        let (_, recipe_store) = store::<Recipe>(vec![]);
        let (_, todo_store) = store::<Todo>(vec![]);
        let stores = Stores {
            comments: comment_store,
            posts: post_store,
            recipes: recipe_store,
            todos: todo_store,
        };

        let (input, mut input_rx) = ChannelInput::channel();
        let (render_tx, _render_rx) = mpsc::unbounded_channel();
        let mut actor = AppActor::new(stores, input, ResourceKind::Comments, render_tx);
        actor.state.switch_tab(ResourceKind::Comments);

        let (reply, mut answer) = tokio::sync::oneshot::channel();
        actor.state.push_request(InputRequest::Prompt {
            message: "Enter your comment:".to_string(),
            default: None,
            reply,
        });

        // keys that arrive as list commands before the popup is drawn
        assert!(!actor.handle_ui_event(UiEvent::Delete));
        assert!(!actor.handle_ui_event(UiEvent::SwitchTab(ResourceKind::Todos)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(input_rx.try_recv().is_err());
        assert_eq!(actor.state.active_tab, ResourceKind::Comments);
        assert_eq!(actor.state.pending_input.len(), 1);
        assert_eq!(comments.calls(), vec!["fetch"]);

        // the popup still takes its own events
        actor.handle_ui_event(UiEvent::PopupChar('d'));
        actor.handle_ui_event(UiEvent::PopupSubmit);
        assert_eq!(answer.try_recv().unwrap(), Some("d".to_string()));
        assert!(actor.handle_ui_event(UiEvent::Quit));
    }
}
