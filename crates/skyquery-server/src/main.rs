//! SkyQuery server - HTTP chat surface over the hybrid retrieval orchestrator.

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod routes;
mod state;

pub use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "skyquery-server")]
#[command(about = "SkyQuery - hybrid satellite data product Q&A over HTTP")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Path to the chunk corpus (JSONL) for the semantic index
    #[arg(short, long)]
    corpus: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    let state = AppState::from_env(cli.corpus.as_deref())?;

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "skyquery-server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
