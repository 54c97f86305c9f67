//! TCP daemon: line-delimited JSON over plain sockets
//!
//! One task per connection. Each request line is handed to the blocking
//! pool, because engine locks and snapshot writes are synchronous, and the
//! response line is written back in request order.
//!
//! ## Backpressure
//!
//! A semaphore caps live connections. When all permits are taken the accept
//! loop stops accepting and further clients wait in the listen backlog.
//!
//! ## Shutdown
//!
//! On the shutdown signal the accept loop stops, every connection stops
//! reading new lines, and commands already dispatched run to completion
//! before [`Server::run_until`] returns.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use mpdb_executor::{Error, Executor, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// A bound, not yet running daemon
pub struct Server {
    listener: TcpListener,
    executor: Executor,
    permits: Arc<Semaphore>,
}

impl Server {
    /// Bind `addr` and serve `executor` with at most `max_connections` clients
    pub async fn bind(addr: &str, executor: Executor, max_connections: usize) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            executor,
            permits: Arc::new(Semaphore::new(max_connections.max(1))),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then drain connections
    pub async fn run_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut connections = JoinSet::new();

        info!(addr = %self.local_addr()?, "Listening");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Connection task failed");
                    }
                }
                accepted = accept(&self.listener, &self.permits) => {
                    let (stream, peer, permit) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!(error = %e, "Accept failed");
                            continue;
                        }
                    };
                    let executor = self.executor.clone();
                    let stop = stop_rx.clone();
                    connections.spawn(async move {
                        let _permit = permit;
                        debug!(%peer, "Client connected");
                        match serve_connection(stream, executor, stop).await {
                            Ok(()) => debug!(%peer, "Client disconnected"),
                            Err(e) => debug!(%peer, error = %e, "Connection closed with error"),
                        }
                    });
                }
            }
        }

        info!(
            open_connections = connections.len(),
            "Shutting down, finishing in-flight commands"
        );
        let _ = stop_tx.send(true);
        while let Some(joined) = connections.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Connection task failed");
            }
        }
        info!("Server stopped");
        Ok(())
    }
}

async fn accept(
    listener: &TcpListener,
    permits: &Arc<Semaphore>,
) -> io::Result<(TcpStream, SocketAddr, OwnedSemaphorePermit)> {
    let permit = Arc::clone(permits)
        .acquire_owned()
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let (stream, peer) = listener.accept().await?;
    Ok((stream, peer, permit))
}

/// Read request lines until EOF or shutdown, answering each in order
async fn serve_connection(
    stream: TcpStream,
    executor: Executor,
    mut stop: watch::Receiver<bool>,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            _ = stop.changed() => break,
            read = reader.read_until(b'\n', &mut buf) => read?,
        };
        if read == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim_end_matches(&['\n', '\r'][..]);
                if line.trim().is_empty() {
                    continue;
                }
                let line = line.to_string();
                let ex = executor.clone();
                tokio::task::spawn_blocking(move || ex.handle_line(&line))
                    .await
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
            }
            Err(e) => {
                debug!(error = %e, "Request line is not valid UTF-8");
                Response::error(&Error::malformed(format!("request is not valid UTF-8: {}", e)))
                    .to_line()
            }
        };

        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
