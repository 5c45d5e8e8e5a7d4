//! `tiny_http` server adapter
//!
//! Owns the listener and the worker threads. Each worker pulls requests off
//! the shared server, routes them, and writes the reply back.

use std::fmt;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use ::tiny_http::{Header, Request, Response, Server, StatusCode};
use thiserror::Error;

use crate::adapters;
use crate::config::ServerConfig;
use crate::core::ports::{ItemStore, StoreError};

use super::router::{Reply, ReplyBody, Router};
use super::static_files::StaticFiles;

/// Errors raised while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The store could not be opened or closed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The listener could not be bound
    #[error("failed to bind {addr}: {message}")]
    Bind {
        /// Address that was requested
        addr: String,
        /// Reason reported by the listener
        message: String,
    },

    /// A worker thread could not be started
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A worker thread panicked
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// A bound, ready-to-serve item server
///
/// Construction connects the store and binds the listener, so holding an
/// `ItemServer` means the service is ready to accept requests.
pub struct ItemServer {
    http: Arc<Server>,
    router: Arc<Router>,
    store: Arc<dyn ItemStore>,
    workers: usize,
}

impl ItemServer {
    /// Connect the configured store and bind the configured address
    pub fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let store = adapters::connect(&config.database_url)?;
        Self::with_store(config, store)
    }

    /// Bind the configured address over an already connected store
    pub fn with_store(config: &ServerConfig, store: Arc<dyn ItemStore>) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let http = Server::http(addr.as_str()).map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            message: e.to_string(),
        })?;

        let mut router = Router::new(Arc::clone(&store), config.api);
        if let Some(dir) = &config.static_dir {
            router = router.with_static_files(StaticFiles::new(dir));
        }

        Ok(Self {
            http: Arc::new(http),
            router: Arc::new(router),
            store,
            workers: config.workers.max(1),
        })
    }

    /// Address the listener is bound to
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve until every worker stops, then close the store
    pub fn run(self) -> Result<(), ServerError> {
        self.spawn()?.wait()
    }

    /// Start the workers in the background
    pub fn spawn(self) -> Result<RunningServer, ServerError> {
        let addr = self.local_addr();
        let mut handles = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let http = Arc::clone(&self.http);
            let router = Arc::clone(&self.router);
            let handle = thread::Builder::new()
                .name(format!("http-worker-{index}"))
                .spawn(move || worker_loop(&http, &router))
                .map_err(ServerError::Spawn)?;
            handles.push(handle);
        }
        log::debug!("Started {} worker(s)", handles.len());

        Ok(RunningServer {
            http: self.http,
            store: self.store,
            handles,
            addr,
        })
    }
}

impl fmt::Debug for ItemServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemServer")
            .field("addr", &self.local_addr())
            .field("router", &self.router)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

/// Handle to a server whose workers are running
pub struct RunningServer {
    http: Arc<Server>,
    store: Arc<dyn ItemStore>,
    handles: Vec<JoinHandle<()>>,
    addr: Option<SocketAddr>,
}

impl fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningServer")
            .field("addr", &self.addr)
            .field("workers", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl RunningServer {
    /// Address the listener is bound to
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Stop all workers, then close the store
    pub fn shutdown(self) -> Result<(), ServerError> {
        for _ in &self.handles {
            self.http.unblock();
        }
        self.wait()
    }

    fn wait(self) -> Result<(), ServerError> {
        let mut panicked = false;
        for handle in self.handles {
            panicked |= handle.join().is_err();
        }
        self.store.close()?;
        log::info!("Server stopped");
        if panicked {
            return Err(ServerError::WorkerPanicked);
        }
        Ok(())
    }
}

fn worker_loop(http: &Server, router: &Router) {
    loop {
        match http.recv() {
            Ok(request) => handle_request(router, request),
            Err(e) => {
                log::debug!("Worker stopping: {e}");
                break;
            },
        }
    }
}

// =============================================================================
// REQUEST HANDLING
// =============================================================================

/// Route one request and write its response
fn handle_request(router: &Router, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let reply = router.handle(&method, &url, request.as_reader());
    log::info!("{method} {url} -> {}", reply.status);

    if let Err(e) = request.respond(into_response(reply)) {
        log::warn!("Failed to send response for {method} {url}: {e}");
    }
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

fn into_response(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    let (data, content_type) = match reply.body {
        ReplyBody::Json(json) => (json.into_bytes(), Some("application/json")),
        ReplyBody::File { data, content_type } => (data, Some(content_type)),
        ReplyBody::Empty => (Vec::new(), None),
    };

    let mut response = Response::from_data(data).with_status_code(StatusCode(reply.status));
    if let Some(value) = content_type {
        match Header::from_bytes("Content-Type", value) {
            Ok(header) => response = response.with_header(header),
            Err(()) => log::warn!("Invalid content type {value}"),
        }
    }
    response
}
