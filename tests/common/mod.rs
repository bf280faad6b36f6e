#![allow(dead_code)]

use async_trait::async_trait;
use scrawl::auth::{CredentialVerifier, DynVerifier};
use scrawl::error::AuthError;
use scrawl::store::Store;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// Cheap stand-in for the Argon2 verifier so tests don't pay for real
/// key derivation on every registration.
pub struct PlainVerifier;

#[async_trait]
impl CredentialVerifier for PlainVerifier {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        Ok(stored == format!("plain:{password}"))
    }
}

pub fn plain_verifier() -> DynVerifier {
    Arc::new(PlainVerifier)
}

/// A store snapshotting into its own temp directory. Keep the guard alive
/// for the duration of the test.
pub fn temp_store() -> (Store, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("data.json"));
    (store, dir)
}

/// Bind a listener on an ephemeral port and serve sessions until the
/// test ends.
pub async fn spawn_server(store: Store) -> SocketAddr {
    spawn_server_with_idle_timeout(store, 0).await
}

/// Same, with a per-read idle timeout in seconds.
pub async fn spawn_server_with_idle_timeout(store: Store, idle_timeout_secs: u64) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (sock, _) = listener.accept().await.unwrap();
            let st = store.clone();
            tokio::spawn(async move {
                let _ = scrawl::handle_client(sock, st, plain_verifier(), idle_timeout_secs).await;
            });
        }
    });
    addr
}

pub async fn connect(addr: SocketAddr) -> (BufReader<OwnedReadHalf>, OwnedWriteHalf) {
    let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let (read_half, write_half) = stream.into_split();
    (BufReader::new(read_half), write_half)
}

pub async fn send_line(writer: &mut OwnedWriteHalf, line: &str) {
    writer.write_all(line.as_bytes()).await.unwrap();
    writer.write_all(b"\n").await.unwrap();
}

/// Read exactly one line.
pub async fn next_line(reader: &mut BufReader<OwnedReadHalf>) -> String {
    let mut line = String::new();
    let n = reader.read_line(&mut line).await.unwrap();
    assert!(n > 0, "connection closed");
    line
}

/// Read lines until one contains `needle`, returning that line. Panics
/// after a generous cap so a protocol mismatch fails instead of hanging.
pub async fn read_until(reader: &mut BufReader<OwnedReadHalf>, needle: &str) -> String {
    for _ in 0..100 {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await.unwrap();
        assert!(n > 0, "connection closed while waiting for {needle:?}");
        if line.contains(needle) {
            return line;
        }
    }
    panic!("never saw {needle:?} in 100 lines");
}
