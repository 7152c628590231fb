//! HTTP client wrapper - maps collection operations onto REST calls

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::RemoteError;
use crate::models::{FlagField, Item, ItemId, Payload};
use crate::store::RemoteCollection;

/// REST endpoints of one resource kind under a base URL:
///
/// - `GET    {base}/{resource}`       -> `{ "<resource>": [...] }`
/// - `POST   {base}/{resource}/add`   -> created item
/// - `PUT    {base}/{resource}/{id}`  -> updated item
/// - `DELETE {base}/{resource}/{id}`
pub struct HttpRemote<P> {
    client: reqwest::Client,
    base_url: String,
    user_id: u64,
    _payload: PhantomData<fn() -> P>,
}

impl<P: Payload> HttpRemote<P> {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, user_id: u64) -> Self {
        HttpRemote {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id,
            _payload: PhantomData,
        }
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, P::KIND.path())
    }

    pub fn item_url(&self, id: ItemId) -> String {
        format!("{}/{}/{}", self.base_url, P::KIND.path(), id)
    }

    async fn put(&self, id: ItemId, body: &Value) -> Result<reqwest::Response, RemoteError> {
        let url = self.item_url(id);
        send(self.client.put(&url).json(body), "PUT", &url).await
    }
}

/// Send a request and treat any non-2xx status as failure
async fn send(
    req_builder: reqwest::RequestBuilder,
    method: &'static str,
    url: &str,
) -> Result<reqwest::Response, RemoteError> {
    let start = Instant::now();
    tracing::debug!(method, url, "Executing request");

    let resp = req_builder.send().await?;
    let status = resp.status().as_u16();
    tracing::debug!(
        method,
        url,
        status,
        time_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    if !resp.status().is_success() {
        return Err(RemoteError::Status {
            method,
            url: url.to_string(),
            status,
        });
    }
    Ok(resp)
}

/// Read the body as JSON text
async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, RemoteError> {
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl<P: Payload> RemoteCollection<P> for HttpRemote<P> {
    async fn fetch_all(&self) -> Result<Vec<Item<P>>, RemoteError> {
        let url = self.collection_url();
        let resp = send(self.client.get(&url), "GET", &url).await?;
        let mut envelope: serde_json::Map<String, Value> = read_json(resp).await?;

        let key = P::KIND.path();
        let list = envelope
            .remove(key)
            .ok_or(RemoteError::MissingCollection(key))?;
        Ok(serde_json::from_value(list)?)
    }

    async fn create(&self, payload: &P) -> Result<Item<P>, RemoteError> {
        let url = format!("{}/add", self.collection_url());
        let body = payload.create_body(self.user_id);
        let resp = send(self.client.post(&url).json(&body), "POST", &url).await?;
        read_json(resp).await
    }

    async fn update(&self, id: ItemId, payload: &P) -> Result<Item<P>, RemoteError> {
        let resp = self.put(id, &payload.update_body()).await?;
        read_json(resp).await
    }

    async fn set_flag(&self, id: ItemId, field: FlagField, value: bool) -> Result<(), RemoteError> {
        let mut body = serde_json::Map::new();
        body.insert(field.as_str().to_string(), json!(value));
        self.put(id, &Value::Object(body)).await?;
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), RemoteError> {
        let url = self.item_url(id);
        send(self.client.delete(&url), "DELETE", &url).await?;
        Ok(())
    }
}

/// Create an HTTP client with the configured request timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
