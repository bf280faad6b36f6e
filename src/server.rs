//! TCP server: accept loop, per-connection sessions, periodic reporting.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::auth::{ArgonVerifier, DynVerifier};
use crate::config::Config;
use crate::handlers::{HandlerContext, ReplyKind, dispatch_line};
use crate::registry::ConnectionRegistry;
use crate::responses;
use crate::store::Store;

fn listen_addr(raw: &str) -> String {
    if raw.parse::<SocketAddr>().is_ok() {
        raw.to_string()
    } else if let Some(port) = raw.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        format!("0.0.0.0:{raw}")
    }
}

/// Drive a single connection: welcome banner, then one line in, one reply
/// out until `exit`, idle timeout, or a transport failure.
///
/// # Errors
///
/// Returns an error only on transport failure; protocol-level problems are
/// rendered as replies and keep the session alive.
pub async fn handle_client<S>(
    socket: S,
    store: Store,
    verifier: DynVerifier,
    idle_timeout_secs: u64,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = io::split(socket);
    let mut reader = BufReader::new(read_half);
    write_half.write_all(responses::MSG_WELCOME.as_bytes()).await?;
    write_half.write_all(b"\n").await?;

    let mut ctx = HandlerContext::new(store, verifier);
    let mut line = String::new();
    loop {
        line.clear();
        let n = if idle_timeout_secs > 0 {
            let timeout = Duration::from_secs(idle_timeout_secs);
            match tokio::time::timeout(timeout, reader.read_line(&mut line)).await {
                Ok(read) => read?,
                Err(_) => {
                    info!("closing idle connection");
                    break;
                }
            }
        } else {
            reader.read_line(&mut line).await?
        };
        if n == 0 {
            break;
        }
        let reply = dispatch_line(&mut ctx, &line).await;
        write_half.write_all(reply.text.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        if reply.kind == ReplyKind::Goodbye {
            break;
        }
    }
    Ok(())
}

/// Run the server until ctrl-c.
pub async fn run(cfg: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let store = Store::open(&cfg.data_path);
    let verifier: DynVerifier = Arc::new(ArgonVerifier);
    let registry = ConnectionRegistry::new();

    let addr = listen_addr(&cfg.addr);
    info!("listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;

    // Periodic connected-client report, same lock as the accept path.
    let report_registry = registry.clone();
    let report_interval = cfg.report_interval_secs.max(1);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(report_interval));
        loop {
            ticker.tick().await;
            let peers = report_registry.peers();
            info!(connected = peers.len(), peers = ?peers, "connected clients");
        }
    });

    let idle_timeout_secs = cfg.idle_timeout_secs;
    tokio::spawn(async move {
        loop {
            let (socket, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("accept error: {e}");
                    continue;
                }
            };
            info!(%peer, "accepted connection");
            registry.register(peer);
            let st = store.clone();
            let vf = verifier.clone();
            let reg = registry.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_client(socket, st, vf, idle_timeout_secs).await {
                    error!(%peer, "client error: {e}");
                }
                // One release per accept, on every exit path; the socket
                // closes when the task drops it.
                reg.release(&peer);
                info!(%peer, "connection closed");
            });
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    Ok(())
}
