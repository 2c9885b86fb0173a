//! User REST API server.
//!
//! Serves CRUD endpoints over an in-memory user list that lives as long as
//! the process.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use campus_api::router::{UserRouter, USER_ENDPOINTS};
use campus_api::server::Server;
use campus_core::config::{IdPolicy, UserConfig};
use campus_core::store::UserStore;

/// Command-line arguments for the user server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Never hand out an id twice, even after the newest user is deleted
    #[arg(long)]
    monotonic_ids: bool,

    /// Start with an empty user list
    #[arg(long)]
    no_seed: bool,
}

impl Args {
    fn config(&self) -> UserConfig {
        UserConfig {
            request_timeout_ms: self.request_timeout_ms,
            id_policy: if self.monotonic_ids {
                IdPolicy::Monotonic
            } else {
                IdPolicy::MaxPlusOne
            },
            seed: !self.no_seed,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.config();
    let store = if config.seed {
        UserStore::seeded(config.id_policy)
    } else {
        UserStore::new(config.id_policy)
    };
    tracing::info!(
        "Loaded {} users (id policy: {:?})",
        store.len(),
        config.id_policy
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid listen address")?;
    let router = UserRouter::new(Arc::new(store), Arc::new(config));
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let addr = server.local_addr()?;

    tracing::info!("Server running on port {}", addr.port());
    tracing::info!("API docs: http://{}/", addr);
    for (route, description) in USER_ENDPOINTS {
        tracing::info!("- {:<24}: {}", route, description);
    }

    tokio::select! {
        result = server.serve() => result.context("Server stopped accepting connections")?,
        result = signal::ctrl_c() => {
            result.context("Failed to listen for ctrl_c")?;
            tracing::info!("Shutting down server...");
        }
    }

    Ok(())
}
