use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use reposnap::store::DEFAULT_MAX_SIZE;

mod app;
mod logging;
mod shutdown;

use self::app::{build_app_router, build_state};
use self::logging::init_tracing;
use self::shutdown::shutdown_signal;

#[derive(Parser)]
#[command(name = "reposnap-server")]
#[command(about = "Serves files from shallow repository snapshots", long_about = None)]
pub(super) struct Args {
    /// Address to listen on
    #[arg(long, env = "REPOSNAP_ADDR", default_value = "127.0.0.1:8080")]
    pub(super) addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    pub(super) addr_file: Option<PathBuf>,

    /// Directory holding one snapshot per owner/repo
    #[arg(long, env = "REPOSNAP_DATA_DIR", default_value = "./repos")]
    pub(super) data_dir: PathBuf,

    /// Wall-clock limit for a single clone, in seconds
    #[arg(long, default_value_t = 300)]
    pub(super) clone_timeout_secs: u64,

    /// Per-file byte budget for `/analyze` requests that do not set `max_size`
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    pub(super) default_max_size: u64,

    /// git executable used for clones
    #[arg(long, env = "REPOSNAP_GIT", default_value = "git")]
    pub(super) git: PathBuf,

    /// Log filter directives (overridden by RUST_LOG)
    #[arg(long, default_value = "reposnap=info,reposnap_server=info")]
    pub(super) log: String,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log);

    let state = build_state(&args)?;
    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("listen on {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(
        addr = %local_addr,
        data_dir = %args.data_dir.display(),
        "reposnap-server listening"
    );
    if let Some(path) = &args.addr_file {
        publish_addr(path, local_addr)?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Record the bound address so callers that asked for port 0 can find us.
fn publish_addr(path: &std::path::Path, addr: SocketAddr) -> Result<()> {
    std::fs::write(path, addr.to_string())
        .with_context(|| format!("publish listen address to {}", path.display()))
}
