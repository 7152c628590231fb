//! Input capture - prompt/confirm capability injected into the actions
//!
//! Stores never block on user input. Callers hand an [`InputProvider`] to
//! the flows in `store::actions`, which turn answers into payloads.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::constants::DEFAULT_POST_ID;
use crate::models::{split_list, Comment, Payload, Post, Recipe, Todo};

/// Something that can ask the user for text or a yes/no answer
#[async_trait]
pub trait InputProvider: Send + Sync {
    /// `None` means the user cancelled
    async fn prompt(&self, message: &str, default: Option<&str>) -> Option<String>;

    async fn confirm(&self, message: &str) -> bool;
}

/// One question asked while capturing a payload
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub message: &'static str,
    pub default: Option<String>,
}

impl Prompt {
    fn new(message: &'static str) -> Self {
        Prompt {
            message,
            default: None,
        }
    }

    fn with_default(message: &'static str, default: impl Into<String>) -> Self {
        Prompt {
            message,
            default: Some(default.into()),
        }
    }
}

/// How a payload is asked for. `current` is the item being edited, `None`
/// when adding.
pub trait Capture: Payload {
    fn prompts(current: Option<&Self>) -> Vec<Prompt>;

    /// Build a payload from one non-empty answer per prompt
    fn from_answers(answers: Vec<String>, current: Option<&Self>) -> Option<Self>;
}

/// Ask every prompt, then build the payload. Any cancelled or blank answer
/// yields `None`.
pub async fn capture<P: Capture>(input: &dyn InputProvider, current: Option<&P>) -> Option<P> {
    let prompts = P::prompts(current);
    let mut answers = Vec::with_capacity(prompts.len());
    for prompt in &prompts {
        answers.push(input.prompt(prompt.message, prompt.default.as_deref()).await);
    }

    let answers: Option<Vec<String>> = answers
        .into_iter()
        .map(|answer| answer.filter(|text| !text.trim().is_empty()))
        .collect();
    P::from_answers(answers?, current)
}

impl Capture for Comment {
    fn prompts(current: Option<&Self>) -> Vec<Prompt> {
        match current {
            None => vec![Prompt::new("Enter your comment:")],
            Some(c) => vec![Prompt::with_default("Edit your comment:", c.body.as_str())],
        }
    }

    fn from_answers(answers: Vec<String>, current: Option<&Self>) -> Option<Self> {
        let [body] = <[String; 1]>::try_from(answers).ok()?;
        Some(Comment {
            body,
            post_id: current.map_or(DEFAULT_POST_ID, |c| c.post_id),
        })
    }
}

impl Capture for Post {
    fn prompts(current: Option<&Self>) -> Vec<Prompt> {
        match current {
            None => vec![
                Prompt::new("Enter post title:"),
                Prompt::new("Enter post body:"),
            ],
            Some(p) => vec![
                Prompt::with_default("Edit title:", p.title.as_str()),
                Prompt::with_default("Edit body:", p.body.as_str()),
            ],
        }
    }

    fn from_answers(answers: Vec<String>, _current: Option<&Self>) -> Option<Self> {
        let [title, body] = <[String; 2]>::try_from(answers).ok()?;
        Some(Post { title, body })
    }
}

impl Capture for Recipe {
    fn prompts(current: Option<&Self>) -> Vec<Prompt> {
        match current {
            None => vec![
                Prompt::new("Enter recipe name:"),
                Prompt::new("Enter ingredients:"),
            ],
            Some(r) => vec![
                Prompt::with_default("Edit recipe name:", r.name.as_str()),
                Prompt::with_default("Edit ingredients:", r.ingredients.join(", ")),
            ],
        }
    }

    fn from_answers(answers: Vec<String>, _current: Option<&Self>) -> Option<Self> {
        let [name, ingredients] = <[String; 2]>::try_from(answers).ok()?;
        Some(Recipe {
            name,
            ingredients: split_list(&ingredients),
        })
    }
}

impl Capture for Todo {
    fn prompts(current: Option<&Self>) -> Vec<Prompt> {
        match current {
            None => vec![Prompt::new("Enter a new todo:")],
            Some(t) => vec![Prompt::with_default("Edit todo:", t.todo.as_str())],
        }
    }

    fn from_answers(answers: Vec<String>, current: Option<&Self>) -> Option<Self> {
        let [todo] = <[String; 1]>::try_from(answers).ok()?;
        Some(Todo {
            todo,
            completed: current.is_some_and(|t| t.completed),
        })
    }
}

/// Answers from a queue. An exhausted queue cancels prompts and declines
/// confirmations.
#[derive(Default)]
pub struct ScriptedInput {
    answers: Mutex<VecDeque<Option<String>>>,
    confirms: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: impl Into<String>) -> Self {
        self.answers
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Some(text.into()));
        self
    }

    pub fn cancel(mut self) -> Self {
        self.answers
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(None);
        self
    }

    pub fn confirm_with(mut self, yes: bool) -> Self {
        self.confirms
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(yes);
        self
    }

    /// Messages of every prompt and confirmation asked so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn record(&self, message: &str) {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
    }
}

#[async_trait]
impl InputProvider for ScriptedInput {
    async fn prompt(&self, message: &str, _default: Option<&str>) -> Option<String> {
        self.record(message);
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .flatten()
    }

    async fn confirm(&self, message: &str) -> bool {
        self.record(message);
        self.confirms
            .lock()
            .ok()
            .and_then(|mut confirms| confirms.pop_front())
            .unwrap_or(false)
    }
}

/// A question forwarded to whoever owns the screen
#[derive(Debug)]
pub enum InputRequest {
    Prompt {
        message: String,
        default: Option<String>,
        reply: oneshot::Sender<Option<String>>,
    },
    Confirm {
        message: String,
        reply: oneshot::Sender<bool>,
    },
}

/// Forwards questions over a channel and waits for the reply. A closed
/// channel or dropped reply counts as cancel / decline.
#[derive(Clone)]
pub struct ChannelInput {
    tx: mpsc::UnboundedSender<InputRequest>,
}

impl ChannelInput {
    pub fn new(tx: mpsc::UnboundedSender<InputRequest>) -> Self {
        ChannelInput { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<InputRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelInput::new(tx), rx)
    }
}

#[async_trait]
impl InputProvider for ChannelInput {
    async fn prompt(&self, message: &str, default: Option<&str>) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        let request = InputRequest::Prompt {
            message: message.to_string(),
            default: default.map(String::from),
            reply,
        };
        if self.tx.send(request).is_err() {
            return None;
        }
        rx.await.unwrap_or(None)
    }

    async fn confirm(&self, message: &str) -> bool {
        let (reply, rx) = oneshot::channel();
        let request = InputRequest::Confirm {
            message: message.to_string(),
            reply,
        };
        if self.tx.send(request).is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }
}
