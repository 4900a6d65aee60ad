use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use courier::config::Config;
use courier::server;

#[derive(Parser, Debug)]
#[command(name = "courier", about = "Small HTTP/1.1 echo and file server")]
struct Cli {
    /// YAML config file; environment variables are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory served under /files/
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:4221
    #[arg(short, long)]
    listen: Option<String>,

    /// Maximum number of connections served at once
    #[arg(long)]
    max_connections: Option<NonZeroUsize>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::load()?,
        };

        if let Some(dir) = self.directory.filter(|d| !d.as_os_str().is_empty()) {
            cfg.files.directory = Some(dir);
        }
        if let Some(addr) = self.listen {
            cfg.server.listen_addr = addr;
        }
        if let Some(n) = self.max_connections {
            cfg.server.max_connections = Some(n.get());
        }

        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Cli::parse().into_config()?;

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
