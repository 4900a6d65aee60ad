use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{info, warn, Instrument};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::router::Router;
use crate::storage::FileStore;

/// Source of client connections for [`serve`].
pub trait Acceptor: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;
}

impl Acceptor for TcpListener {
    type Stream = TcpStream;

    async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}

/// Builds the router for `cfg`, with file routes only if a directory is set.
pub fn router_for(cfg: &Config) -> Router<FileStore> {
    let files = cfg
        .files
        .directory
        .as_ref()
        .map(|dir| Arc::new(FileStore::new(dir)));
    Router::new(files)
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        directory = ?cfg.files.directory,
        "Listening"
    );

    serve(listener, router_for(cfg), cfg.server.max_connections).await
}

/// Accepts connections forever, serving each one on its own task.
///
/// With `max_connections` set, accepting pauses while that many
/// connections are open. A failed accept is logged and skipped.
pub async fn serve<A: Acceptor>(
    mut acceptor: A,
    router: Router<FileStore>,
    max_connections: Option<usize>,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        max_connections != Some(0),
        "max_connections must be at least 1"
    );
    let limit = max_connections.map(|n| Arc::new(Semaphore::new(n)));

    loop {
        let permit = match &limit {
            Some(sem) => Some(sem.clone().acquire_owned().await?),
            None => None,
        };

        let (socket, peer) = match acceptor.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = router.clone();
        tokio::spawn(
            async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, router);
                match conn.run().await {
                    Ok(()) => tracing::debug!("Connection closed"),
                    Err(e) => tracing::warn!("Connection error: {:#}", e),
                }
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}
