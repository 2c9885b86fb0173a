//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::TcpListener;

use crate::handlers::request_utils::read_body_with_timeout;
use crate::router::Routes;

/// HTTP server for one service, holding its bound listener.
pub struct Server<R> {
    listener: TcpListener,
    router: Arc<R>,
}

impl<R: Routes> Server<R> {
    /// Binds `addr` for the given router.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to
    /// * `router` - Service router
    ///
    /// # Errors
    /// Returns the bind error, e.g. when the address is already in use.
    pub async fn bind(addr: SocketAddr, router: R) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener, router))
    }

    /// Wraps an already bound listener.
    pub fn from_listener(listener: TcpListener, router: R) -> Self {
        Self {
            listener,
            router: Arc::new(router),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Serves connections until accepting one fails.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let Self { listener, router } = self;
        tracing::info!("Server listening on http://{}", listener.local_addr()?);

        loop {
            let (stream, peer) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = Arc::clone(&router);

            tokio::task::spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                if let Err(err) = builder
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| {
                            handle_request(req, Arc::clone(&router))
                        }),
                    )
                    .await
                {
                    tracing::error!("Error serving connection from {}: {}", peer, err);
                }
            });
        }
    }
}

/// Reads the body, then hands the request to the router.
async fn handle_request<R: Routes>(
    req: Request<IncomingBody>,
    router: Arc<R>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let response = match read_body_with_timeout(body, router.request_timeout_ms()).await {
        Ok(bytes) => router.route(Request::from_parts(parts, bytes)).await,
        Err(err) => router.reject(err),
    };
    Ok(response.map(Full::new))
}
