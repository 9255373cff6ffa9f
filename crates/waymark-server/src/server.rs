//! HTTP server.
//!
//! Serves a [`Router`] over HTTP/1.1 with hyper on a tokio listener. Shutdown
//! stops accepting, asks open connections to finish their current request,
//! and gives up after the configured timeout.
//!
//! ```rust,no_run
//! use waymark_server::{Router, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Router::new();
//!     // register routes...
//!
//!     let config = ServerConfig::default().with_env_overrides();
//!     Server::new(config, router).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::response::{error_response, HttpResponse};
use crate::router::Router;
use crate::shutdown::ShutdownSignal;

/// An HTTP server for one [`Router`].
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    /// Creates a server. Nothing is bound until it runs.
    #[must_use]
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self { config, router }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the router being served.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Binds the configured address and serves until ctrl-c.
    ///
    /// # Errors
    ///
    /// Fails if the address is invalid or cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::ctrl_c()).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Fails if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// # Errors
    ///
    /// Fails if the listener's local address cannot be read.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.router.route_count(), "server listening");

        let server = Arc::new(self);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let shutdown = shutdown.clone();
                        connections.spawn(async move {
                            server.serve_connection(stream, remote_addr, shutdown).await;
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to accept connection"),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                () = shutdown.wait() => break,
            }
        }
        drop(listener);

        let timeout = server.config.shutdown_timeout();
        tracing::info!(open = connections.len(), ?timeout, "shutting down");

        let drained = tokio::time::timeout(timeout, async {
            while connections.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!(
                remaining = connections.len(),
                "shutdown timeout reached, closing remaining connections"
            );
            connections.abort_all();
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn serve_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) {
        let server = Arc::clone(&self);
        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle(request).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        let mut conn = std::pin::pin!(conn);
        let mut draining = false;

        loop {
            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(e) = result {
                        tracing::debug!(remote = %remote_addr, error = %e, "connection error");
                    }
                    break;
                }
                () = shutdown.wait(), if !draining => {
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }

    async fn handle(&self, request: Request<Incoming>) -> HttpResponse {
        let (parts, body) = request.into_parts();

        match Limited::new(body, self.config.max_body_bytes()).collect().await {
            Ok(collected) => {
                let request = Request::from_parts(parts, collected.to_bytes());
                self.router.dispatch(request).await
            }
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::warn!(path = parts.uri.path(), limit = self.config.max_body_bytes(), "request body too large");
                error_response(StatusCode::PAYLOAD_TOO_LARGE, "payload too large")
            }
            Err(e) => {
                tracing::warn!(path = parts.uri.path(), error = %e, "failed to read request body");
                error_response(StatusCode::BAD_REQUEST, "failed to read request body")
            }
        }
    }
}
