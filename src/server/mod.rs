//! HTTP server adapters
//!
//! This module provides the router that translates HTTP requests into calls
//! on the HTTP-agnostic API layer, and the `tiny_http` server that runs it.

mod router;
mod static_files;
mod tiny_http;

pub use self::router::{MAX_BODY_BYTES, Reply, ReplyBody, Router};
pub use self::static_files::StaticFiles;
pub use self::tiny_http::{ItemServer, RunningServer, ServerError};
