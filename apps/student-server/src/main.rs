//! Student REST API server.
//!
//! Serves CRUD and search endpoints over a Supabase-hosted student table.
//! Settings may also come from a `.env` file in the working directory.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use campus_api::router::{StudentRouter, STUDENT_ENDPOINTS};
use campus_api::server::Server;
use campus_core::config::StudentConfig;
use campus_core::store::SupabaseStore;

/// Command-line arguments for the student server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Supabase API key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,

    /// Table holding the student rows
    #[arg(long, default_value = "students")]
    table: String,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Hide upstream store error messages from clients
    #[arg(long)]
    redact_store_errors: bool,
}

impl Args {
    /// Builds the service config; `None` if a Supabase setting is missing.
    fn into_config(self) -> Option<StudentConfig> {
        let supabase_url = self.supabase_url.filter(|v| !v.is_empty())?;
        let supabase_key = self.supabase_key.filter(|v| !v.is_empty())?;
        Some(StudentConfig {
            supabase_url,
            supabase_key,
            table: self.table,
            request_timeout_ms: self.request_timeout_ms,
            redact_store_errors: self.redact_store_errors,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values already in the environment win over `.env`
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid listen address")?;

    let Some(config) = args.into_config() else {
        tracing::error!("Supabase configuration required!");
        tracing::error!("Create a .env file, set these environment variables, or pass --supabase-url/--supabase-key:");
        tracing::error!("   SUPABASE_URL=your-actual-supabase-url");
        tracing::error!("   SUPABASE_KEY=your-actual-supabase-anon-key");
        std::process::exit(1);
    };

    let store = SupabaseStore::new(&config).context("Failed to create Supabase client")?;
    let router = StudentRouter::new(Arc::new(store), Arc::new(config));
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let addr = server.local_addr()?;

    tracing::info!("Student REST API server running on port {}", addr.port());
    tracing::info!("Available endpoints:");
    for (route, description) in STUDENT_ENDPOINTS {
        tracing::info!("- {:<36}: {}", route, description);
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
