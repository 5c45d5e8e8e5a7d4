//! Request routing
//!
//! Maps method + path to the API handlers and turns their results into
//! framework-neutral [`Reply`] values. The HTTP server adapter only has to
//! copy a `Reply` onto the wire.

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tiny_http::Method;

use crate::api::{
    self, ApiError, ApiErrorData, ApiPolicy, CreateItemRequest, EmptyBody, ErrorCode,
    MutationStatus, ReplaceItemRequest,
};
use crate::core::ports::ItemStore;

use super::static_files::StaticFiles;

const ITEMS_PATH: &str = "/items";
const ITEM_PREFIX: &str = "/items/";
const FALLBACK_BODY: &str = r#"{"message":"Internal Server Error"}"#;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Body of a routed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// Serialized JSON document
    Json(String),
    /// Static file contents
    File {
        /// Raw bytes
        data: Vec<u8>,
        /// MIME type derived from the file extension
        content_type: &'static str,
    },
    /// No body (204)
    Empty,
}

/// Status plus body, ready to be written by an HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: ReplyBody,
}

impl Reply {
    /// Body as UTF-8 text, empty for [`ReplyBody::Empty`]
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.body {
            ReplyBody::Json(json) => json,
            ReplyBody::File { data, .. } => std::str::from_utf8(data).unwrap_or_default(),
            ReplyBody::Empty => "",
        }
    }
}

/// Routes requests for the items resource
#[derive(Debug, Clone)]
pub struct Router {
    store: Arc<dyn ItemStore>,
    policy: ApiPolicy,
    static_files: Option<StaticFiles>,
}

impl Router {
    /// Create a router over `store`
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>, policy: ApiPolicy) -> Self {
        Self {
            store,
            policy,
            static_files: None,
        }
    }

    /// Serve files for unmatched `GET` and `HEAD` requests
    #[must_use]
    pub fn with_static_files(mut self, files: StaticFiles) -> Self {
        self.static_files = Some(files);
        self
    }

    /// Handle one request
    ///
    /// `url` may carry a query string, which is ignored. `body` is only read
    /// by routes that take a body.
    pub fn handle(&self, method: &Method, url: &str, body: &mut dyn Read) -> Reply {
        let path = url.split_once('?').map_or(url, |(path, _)| path);
        let store = self.store.as_ref();

        match (method, path) {
            // The HTTP layer drops the body for HEAD.
            (&Method::Get | &Method::Head, ITEMS_PATH) => respond(200, api::list_items(store)),

            (&Method::Post, ITEMS_PATH) => match read_json_body::<CreateItemRequest>(body) {
                Ok(req) => respond(201, api::create_item(store, req)),
                Err(e) => error_reply(&e),
            },

            _ if path.starts_with(ITEM_PREFIX) => {
                let id = path.strip_prefix(ITEM_PREFIX).unwrap_or("");
                self.handle_item(method, id, body)
            },

            (&Method::Get | &Method::Head, _) => self.serve_static(method, path),

            _ => not_found(method, path),
        }
    }

    fn handle_item(&self, method: &Method, id: &str, body: &mut dyn Read) -> Reply {
        // `/items/` and `/items/a/b` are routing misses.
        if id.is_empty() || id.contains('/') {
            return not_found(method, &format!("{ITEM_PREFIX}{id}"));
        }
        let store = self.store.as_ref();

        match method {
            Method::Put => {
                let result = read_json_body::<ReplaceItemRequest>(body)
                    .and_then(|req| api::replace_item(store, id, req));
                match result {
                    Ok(item) => self.mutated(&item),
                    Err(e) => error_reply(&e),
                }
            },
            Method::Delete => match api::delete_item(store, id, self.policy.missing_delete) {
                Ok(_) => self.mutated(&EmptyBody {}),
                Err(e) => error_reply(&e),
            },
            _ => not_found(method, &format!("{ITEM_PREFIX}{id}")),
        }
    }

    fn mutated<T: Serialize>(&self, data: &T) -> Reply {
        match self.policy.mutation_status {
            MutationStatus::Ok => json_reply(200, data),
            MutationStatus::NoContent => Reply {
                status: 204,
                body: ReplyBody::Empty,
            },
        }
    }

    fn serve_static(&self, method: &Method, path: &str) -> Reply {
        if let Some(files) = &self.static_files {
            match files.load(path) {
                Ok((data, content_type)) => {
                    return Reply {
                        status: 200,
                        body: ReplyBody::File { data, content_type },
                    };
                },
                Err(e) => log::debug!("No static file for {path}: {e}"),
            }
        }
        not_found(method, path)
    }
}

// =============================================================================
// BODY PARSING
// =============================================================================

/// Read and parse a JSON object body
fn read_json_body<T: DeserializeOwned>(body: &mut dyn Read) -> Result<T, ApiError> {
    let mut raw = String::new();
    body.take(MAX_BODY_BYTES + 1)
        .read_to_string(&mut raw)
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;

    if u64::try_from(raw.len()).unwrap_or(u64::MAX) > MAX_BODY_BYTES {
        return Err(ApiError::bad_request(format!(
            "Request body exceeds {MAX_BODY_BYTES} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(ApiError::bad_request("Request body is empty"));
    }

    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

/// Convert a handler result to a reply
fn respond<T: Serialize>(status: u16, result: Result<T, ApiError>) -> Reply {
    match result {
        Ok(data) => json_reply(status, &data),
        Err(e) => error_reply(&e),
    }
}

/// Create an error reply, logging the detail the client never sees
fn error_reply(error: &ApiError) -> Reply {
    if error.code == ErrorCode::Internal {
        log::error!("{error}");
    } else {
        log::debug!("{error}");
    }
    json_reply(error.status_code(), &ApiErrorData::from(error))
}

fn not_found(method: &Method, path: &str) -> Reply {
    error_reply(&ApiError::not_found(format!("No route for {method} {path}")))
}

/// Serialize data to a JSON reply with status code
fn json_reply<T: Serialize>(status: u16, data: &T) -> Reply {
    match serde_json::to_string(data) {
        Ok(json) => Reply {
            status,
            body: ReplyBody::Json(json),
        },
        Err(e) => {
            log::error!("Failed to serialize response: {e}");
            Reply {
                status: 500,
                body: ReplyBody::Json(FALLBACK_BODY.to_string()),
            }
        },
    }
}
