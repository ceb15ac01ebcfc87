//! HTTP access to the rental REST API.
//!
//! Every call attaches the persisted bearer token when one is held, and every
//! failure is classified into a [`ClientError`] here, once, before it reaches
//! the caller. Connectivity problems, server errors and expired sessions are
//! also announced on the notice bus, mirroring a global response interceptor.

pub mod auth;
pub mod bookings;
pub mod cars;
pub mod contact;
pub mod faq;

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Page, PageMeta};
use crate::notice::NoticeBus;
use crate::storage::{self, LocalStorage};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    storage: Arc<dyn LocalStorage>,
    notices: Option<NoticeBus>,
}

impl ApiClient {
    pub fn new(config: &Config, storage: Arc<dyn LocalStorage>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("rentcar-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            storage,
            notices: None,
        })
    }

    pub fn with_notices(mut self, notices: NoticeBus) -> Self {
        self.notices = Some(notices);
        self
    }

    pub(crate) async fn get(&self, path: &str) -> ClientResult<Value> {
        self.execute(self.request(Method::GET, path), path).await
    }

    pub(crate) async fn get_with<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<Value> {
        self.execute(self.request(Method::GET, path).query(query), path)
            .await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.execute(self.request(Method::POST, path).json(body), path)
            .await
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.execute(self.request(Method::PUT, path).json(body), path)
            .await
    }

    pub(crate) async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.execute(self.request(Method::PATCH, path).json(body), path)
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> ClientResult<Value> {
        self.execute(self.request(Method::DELETE, path), path).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header("Accept", "application/json")
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> ClientResult<Value> {
        let token = storage::load_token(self.storage.as_ref())?;
        let builder = match &token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Request to {path} got no response: {e}");
                return Err(self.announce(ClientError::Transport(e)));
            }
        };

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.announce(ClientError::Transport(e)))?;

        if status.is_success() {
            if body.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|v| error_message(&v));
        let err = self.classify(status, path, token.is_some(), message)?;
        Err(self.announce(err))
    }

    fn classify(
        &self,
        status: StatusCode,
        path: &str,
        had_token: bool,
        message: Option<String>,
    ) -> ClientResult<ClientError> {
        let err = match status.as_u16() {
            // Without a held token there is no session to expire (e.g. bad credentials)
            401 if had_token => {
                tracing::info!("Session rejected by server, clearing stored token");
                storage::clear_token(self.storage.as_ref())?;
                ClientError::AuthExpired
            }
            404 => {
                tracing::warn!("API endpoint not found: {path}");
                ClientError::NotFound {
                    path: path.to_string(),
                }
            }
            code if status.is_server_error() => {
                tracing::error!("Server error {code} on {path}");
                ClientError::Server { status: code }
            }
            code => {
                tracing::debug!("Request to {path} rejected with {code}: {message:?}");
                ClientError::Domain {
                    status: code,
                    message,
                }
            }
        };
        Ok(err)
    }

    fn announce(&self, err: ClientError) -> ClientError {
        if let Some(notices) = &self.notices {
            if err.is_globally_reported() {
                notices.error(err.notice(""));
            }
        }
        err
    }
}

/// Server-provided explanation in an error body.
fn error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .next()
}

/// Split `{ data, meta }` envelopes; bare payloads pass through untouched.
fn split_envelope(body: Value) -> (Value, Option<Value>) {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            let meta = map.remove("meta");
            let data = map.remove("data").unwrap_or(Value::Null);
            (data, meta)
        }
        other => (other, None),
    }
}

/// Decode a single record that may or may not be wrapped in `data`.
pub(crate) fn decode_data<T: DeserializeOwned>(body: Value) -> ClientResult<T> {
    let (data, _) = split_envelope(body);
    Ok(serde_json::from_value(data)?)
}

/// Decode a list endpoint, keeping pagination metadata when present.
pub(crate) fn decode_page<T: DeserializeOwned>(body: Value) -> ClientResult<Page<T>> {
    let (data, meta) = split_envelope(body);
    let items = match data {
        Value::Null => Vec::new(),
        other => serde_json::from_value(other)?,
    };
    let meta = meta
        .and_then(|m| m.get("pagination").cloned())
        .and_then(|p| serde_json::from_value::<PageMeta>(p).ok());
    Ok(Page { items, meta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FaqEntry;
    use serde_json::json;

    #[test]
    fn decode_wrapped_and_bare_records() {
        let wrapped = json!({ "success": true, "data": { "_id": "f1", "question": "Q", "answer": "A" } });
        let bare = json!({ "_id": "f1", "question": "Q", "answer": "A" });
        let a: FaqEntry = decode_data(wrapped).unwrap();
        let b: FaqEntry = decode_data(bare).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decode_page_with_meta() {
        let body = json!({
            "data": [{ "_id": "f1", "question": "Q", "answer": "A", "status": "hidden" }],
            "meta": { "pagination": { "page": 2, "limit": 9, "total": 12 } }
        });
        let page: Page<FaqEntry> = decode_page(body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(
            page.meta,
            Some(PageMeta {
                page: 2,
                limit: 9,
                total: 12
            })
        );
    }

    #[test]
    fn decode_page_bare_list_and_null() {
        let page: Page<FaqEntry> = decode_page(json!([])).unwrap();
        assert!(page.items.is_empty());
        assert!(page.meta.is_none());

        let page: Page<FaqEntry> = decode_page(json!({ "data": null })).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(&json!({ "message": "Car unavailable", "error": "x" })).as_deref(),
            Some("Car unavailable")
        );
        assert_eq!(
            error_message(&json!({ "error": "Bad input" })).as_deref(),
            Some("Bad input")
        );
        assert_eq!(error_message(&json!({ "ok": false })), None);
    }
}
