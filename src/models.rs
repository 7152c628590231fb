use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Identity assigned by the remote source
pub type ItemId = u64;

/// Resource kind - decides endpoint path, wording and payload shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Comments,
    Posts,
    Recipes,
    Todos,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Comments,
        ResourceKind::Posts,
        ResourceKind::Recipes,
        ResourceKind::Todos,
    ];

    /// Path segment and collection key in the list response
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Comments => "comments",
            ResourceKind::Posts => "posts",
            ResourceKind::Recipes => "recipes",
            ResourceKind::Todos => "todos",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Comments => "comment",
            ResourceKind::Posts => "post",
            ResourceKind::Recipes => "recipe",
            ResourceKind::Todos => "todo",
        }
    }

    pub fn plural(&self) -> &'static str {
        self.path()
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Comments => "Comments",
            ResourceKind::Posts => "Posts",
            ResourceKind::Recipes => "Recipes",
            ResourceKind::Todos => "Todos",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ResourceKind::Comments => 0,
            ResourceKind::Posts => 1,
            ResourceKind::Recipes => 2,
            ResourceKind::Todos => 3,
        }
    }

    pub fn next(&self) -> ResourceKind {
        match self {
            ResourceKind::Comments => ResourceKind::Posts,
            ResourceKind::Posts => ResourceKind::Recipes,
            ResourceKind::Recipes => ResourceKind::Todos,
            ResourceKind::Todos => ResourceKind::Comments,
        }
    }

    pub fn prev(&self) -> ResourceKind {
        match self {
            ResourceKind::Comments => ResourceKind::Todos,
            ResourceKind::Posts => ResourceKind::Comments,
            ResourceKind::Recipes => ResourceKind::Posts,
            ResourceKind::Todos => ResourceKind::Recipes,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown resource kind '{0}' (expected comments, posts, recipes or todos)")]
pub struct ParseKindError(String);

impl FromStr for ResourceKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.plural() == lower || k.singular() == lower)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// Boolean fields that can be flipped in place
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagField {
    Completed,
}

impl FlagField {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagField::Completed => "completed",
        }
    }
}

/// A record of the remote collection: server-assigned id plus payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item<P> {
    pub id: ItemId,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> Item<P> {
    pub fn new(id: ItemId, payload: P) -> Self {
        Item { id, payload }
    }
}

/// Resource-specific payload carried by an [`Item`].
///
/// The store is generic over this trait; everything that differs between
/// comments, posts, recipes and todos lives behind it.
pub trait Payload:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: ResourceKind;

    /// True when a user-entered field is blank; such payloads are never sent
    fn is_empty(&self) -> bool;

    /// JSON body for `POST /<resource>/add`
    fn create_body(&self, user_id: u64) -> serde_json::Value;

    /// JSON body for `PUT /<resource>/{id}`
    fn update_body(&self) -> serde_json::Value;

    fn flag(&self, _field: FlagField) -> Option<bool> {
        None
    }

    /// Returns false when the payload has no such flag
    fn set_flag(&mut self, _field: FlagField, _value: bool) -> bool {
        false
    }

    /// Headline shown for the row
    fn title(&self) -> String;

    /// Secondary text shown under the headline
    fn detail(&self) -> String;
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub body: String,
    #[serde(default)]
    pub post_id: u64,
}

impl Payload for Comment {
    const KIND: ResourceKind = ResourceKind::Comments;

    fn is_empty(&self) -> bool {
        blank(&self.body)
    }

    fn create_body(&self, user_id: u64) -> serde_json::Value {
        json!({ "body": self.body, "postId": self.post_id, "userId": user_id })
    }

    fn update_body(&self) -> serde_json::Value {
        json!({ "body": self.body })
    }

    fn title(&self) -> String {
        self.body.clone()
    }

    fn detail(&self) -> String {
        format!("on post #{}", self.post_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Payload for Post {
    const KIND: ResourceKind = ResourceKind::Posts;

    fn is_empty(&self) -> bool {
        blank(&self.title) || blank(&self.body)
    }

    fn create_body(&self, user_id: u64) -> serde_json::Value {
        json!({ "title": self.title, "body": self.body, "userId": user_id })
    }

    fn update_body(&self) -> serde_json::Value {
        json!({ "title": self.title, "body": self.body })
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn detail(&self) -> String {
        self.body.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub ingredients: Vec<String>,
}

impl Payload for Recipe {
    const KIND: ResourceKind = ResourceKind::Recipes;

    fn is_empty(&self) -> bool {
        blank(&self.name) || self.ingredients.iter().all(|i| blank(i))
    }

    /// Ingredients go out as one comma separated line, as typed
    fn create_body(&self, _user_id: u64) -> serde_json::Value {
        json!({ "name": self.name, "ingredients": self.ingredients.join(", ") })
    }

    fn update_body(&self) -> serde_json::Value {
        json!({ "name": self.name, "ingredients": self.ingredients.join(", ") })
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn detail(&self) -> String {
        self.ingredients.join(", ")
    }
}

/// Split a comma separated ingredient line
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Ingredients arrive as a list from the API but as one line from a prompt
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::One(text) => split_list(&text),
        Raw::Many(list) => list,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
}

impl Payload for Todo {
    const KIND: ResourceKind = ResourceKind::Todos;

    fn is_empty(&self) -> bool {
        blank(&self.todo)
    }

    fn create_body(&self, user_id: u64) -> serde_json::Value {
        json!({ "todo": self.todo, "completed": false, "userId": user_id })
    }

    fn update_body(&self) -> serde_json::Value {
        json!({ "todo": self.todo })
    }

    fn flag(&self, field: FlagField) -> Option<bool> {
        match field {
            FlagField::Completed => Some(self.completed),
        }
    }

    fn set_flag(&mut self, field: FlagField, value: bool) -> bool {
        match field {
            FlagField::Completed => self.completed = value,
        }
        true
    }

    fn title(&self) -> String {
        self.todo.clone()
    }

    fn detail(&self) -> String {
        if self.completed {
            "done".to_string()
        } else {
            "open".to_string()
        }
    }
}
