//! lifehub-server: serves the dashboard and publishes its status document

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use lifehub_core::clock::SystemClock;
use lifehub_core::sync::{GitCli, SyncGateway};
use lifehub_server::{create_router, AppState, ServerConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "lifehub-server")]
#[command(about = "Backing HTTP process for the Life Hub dashboard")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "lifehub-server.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "LIFEHUB_PORT")]
    port: Option<u16>,

    /// Directory holding status.json
    #[arg(short, long, env = "LIFEHUB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory served as the dashboard
    #[arg(long, env = "LIFEHUB_WEB_ROOT")]
    web_root: Option<PathBuf>,

    /// Git working tree to publish from
    #[arg(long, env = "LIFEHUB_REPO_DIR")]
    repo_dir: Option<PathBuf>,

    #[arg(long, env = "LIFEHUB_GIT_REMOTE")]
    remote: Option<String>,

    #[arg(long, env = "LIFEHUB_GIT_BRANCH")]
    branch: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lifehub_server=info".parse()?)
                .add_directive("lifehub_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load_or_default(&cli.config)?;

    // Apply CLI overrides
    if let Some(port) = cli.port {
        config.http.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data.dir = data_dir;
    }
    if let Some(web_root) = cli.web_root {
        config.http.web_root = web_root;
    }
    if let Some(repo_dir) = cli.repo_dir {
        config.git.repo_dir = repo_dir;
    }
    if let Some(remote) = cli.remote {
        config.git.remote = remote;
    }
    if let Some(branch) = cli.branch {
        config.git.branch = branch;
    }

    info!("Status file: {}", config.status_path().display());
    info!(
        "Publishing to {} {} from {}",
        config.git.remote,
        config.git.branch,
        config.git.repo_dir.display()
    );

    let git = GitCli::new(&config.git.repo_dir)
        .with_remote(&config.git.remote)
        .with_branch(&config.git.branch);
    let gateway = SyncGateway::new(config.status_path(), Arc::new(git), Arc::new(SystemClock));
    let app = create_router(AppState::new(gateway), &config.http.web_root);

    let addr: SocketAddr = format!("{}:{}", config.http.bind, config.http.port).parse()?;
    info!("Life Hub available at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
