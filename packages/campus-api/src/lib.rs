//! REST API for the student and user services.
//!
//! Provides matchit routers for both services, their handlers and
//! response envelopes, CORS handling, and the hyper server loop.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
