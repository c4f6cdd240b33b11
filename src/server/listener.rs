use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument, error, info, info_span};

use crate::config::ServerConfig;
use crate::http::connection::{Connection, ConnectionSettings};

/// Pause after a failed accept so a persistent error (e.g. fd exhaustion)
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Source of incoming connections.
pub trait Accept {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;
}

impl Accept for TcpListener {
    type Stream = TcpStream;

    fn accept(&mut self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

/// Binds `cfg.listen_addr` and serves until the task is dropped.
///
/// Only a bind failure is returned; accept and connection errors are logged.
pub async fn run(cfg: &ServerConfig, dispatch: Dispatch) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to listen on {}", cfg.listen_addr))?;

    let local = listener.local_addr()?;
    tracing::dispatcher::with_default(&dispatch, || info!(addr = %local, "server started"));

    serve(listener, cfg.clone(), dispatch).await
}

/// Accepts connections from `acceptor` forever, one task per connection.
///
/// The loop itself and every connection task log through `dispatch`.
pub async fn serve<A>(acceptor: A, cfg: ServerConfig, dispatch: Dispatch) -> anyhow::Result<()>
where
    A: Accept + Send,
{
    let outer = dispatch.clone();
    accept_loop(acceptor, cfg, dispatch)
        .with_subscriber(outer)
        .await
}

async fn accept_loop<A>(
    mut acceptor: A,
    cfg: ServerConfig,
    dispatch: Dispatch,
) -> anyhow::Result<()>
where
    A: Accept + Send,
{
    anyhow::ensure!(
        (1..=Semaphore::MAX_PERMITS).contains(&cfg.max_connections),
        "max_connections must be between 1 and {}",
        Semaphore::MAX_PERMITS
    );

    let settings = ConnectionSettings::from(&cfg);
    let limit = Arc::new(Semaphore::new(cfg.max_connections));

    loop {
        let permit = limit.clone().acquire_owned().await?;

        let (stream, peer) = match acceptor.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!(error = %e, "cannot accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!(%peer, "accepted connection");

        let conn = Connection::new(stream, settings.clone());
        let span = info_span!("conn", %peer);
        tokio::spawn(
            async move {
                let _permit = permit;
                if let Err(e) = conn.run().await {
                    error!(%peer, error = %e, "connection error");
                }
            }
            .instrument(span)
            .with_subscriber(dispatch.clone()),
        );
    }
}
