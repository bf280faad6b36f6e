//! Live-connection registry.
//!
//! Tracks the peer address of every open session for the periodic count
//! report. Purely observational: business logic never consults it. One
//! exclusive lock, held only for insert/remove/snapshot.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<HashMap<SocketAddr, Instant>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, peer: SocketAddr) {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .insert(peer, Instant::now());
    }

    pub fn release(&self, peer: &SocketAddr) {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .remove(peer);
    }

    pub fn count(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").len()
    }

    pub fn peers(&self) -> Vec<SocketAddr> {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .keys()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_release_track_count() {
        let reg = ConnectionRegistry::new();
        let a: SocketAddr = "127.0.0.1:40001".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:40002".parse().unwrap();
        reg.register(a);
        reg.register(b);
        assert_eq!(reg.count(), 2);
        reg.release(&a);
        assert_eq!(reg.count(), 1);
        assert_eq!(reg.peers(), vec![b]);
    }

    #[test]
    fn releasing_twice_is_harmless() {
        let reg = ConnectionRegistry::new();
        let a: SocketAddr = "127.0.0.1:40003".parse().unwrap();
        reg.register(a);
        reg.release(&a);
        reg.release(&a);
        assert_eq!(reg.count(), 0);
    }
}
