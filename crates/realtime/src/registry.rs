//! Connection registry: live connections and tenant broadcast groups.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use congrego_core::{ConnectionId, TenantId};

use crate::protocol::ServerMessage;

struct ConnectionHandle {
    /// `None` while the connection is still in the `Connecting` state;
    /// bound exactly once at admission and never changed.
    tenant_id: Option<TenantId>,
    tx: mpsc::Sender<ServerMessage>,
}

/// Registry of live realtime connections.
///
/// Shared mutable state accessed by many connection tasks concurrently;
/// the concurrent map gives per-entry mutual exclusion, and broadcast takes
/// a snapshot of the group's senders before awaiting any send so an
/// in-flight broadcast never observes a mid-iteration mutation.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection in the `Connecting` state (no tenant yet).
    pub fn add(&self, tx: mpsc::Sender<ServerMessage>) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.insert(
            id,
            ConnectionHandle {
                tenant_id: None,
                tx,
            },
        );
        id
    }

    /// Admit a connection to its tenant's broadcast group.
    ///
    /// Returns `false` if the connection was already removed (transport
    /// closed during the handshake).
    pub fn admit(&self, id: ConnectionId, tenant_id: TenantId) -> bool {
        match self.connections.get_mut(&id) {
            Some(mut handle) => {
                handle.tenant_id = Some(tenant_id);
                true
            }
            None => false,
        }
    }

    /// Remove a connection. Idempotent: transport-close and explicit
    /// disconnect can race, and the loser must be a no-op.
    pub fn remove(&self, id: ConnectionId) {
        self.connections.remove(&id);
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections admitted to the given tenant's group.
    pub fn group_size(&self, tenant_id: TenantId) -> usize {
        self.connections
            .iter()
            .filter(|e| e.value().tenant_id == Some(tenant_id))
            .count()
    }

    /// Deliver a message to every connection admitted under `tenant_id`,
    /// and to no others. Returns the number of successful deliveries; sends
    /// to connections that closed between snapshot and send are swallowed.
    pub async fn broadcast(&self, tenant_id: TenantId, msg: ServerMessage) -> usize {
        // Snapshot first: never await while iterating the map.
        let targets: Vec<mpsc::Sender<ServerMessage>> = self
            .connections
            .iter()
            .filter(|e| e.value().tenant_id == Some(tenant_id))
            .map(|e| e.value().tx.clone())
            .collect();

        let mut delivered = 0;
        for tx in targets {
            if tx.send(msg.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (
        mpsc::Sender<ServerMessage>,
        mpsc::Receiver<ServerMessage>,
    ) {
        mpsc::channel(16)
    }

    #[tokio::test]
    async fn broadcast_reaches_only_the_tenant_group() {
        let registry = ConnectionRegistry::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();
        let id_a = registry.add(tx_a);
        let id_b = registry.add(tx_b);
        assert!(registry.admit(id_a, tenant_a));
        assert!(registry.admit(id_b, tenant_b));

        let delivered = registry
            .broadcast(tenant_a, ServerMessage::MembersUpdate { members: vec![] })
            .await;

        assert_eq!(delivered, 1);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn connecting_connections_receive_nothing() {
        let registry = ConnectionRegistry::new();
        let tenant = TenantId::new();

        let (tx, mut rx) = channel();
        registry.add(tx); // never admitted

        let delivered = registry
            .broadcast(tenant, ServerMessage::MembersUpdate { members: vec![] })
            .await;

        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn removal_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        let id = registry.add(tx);

        registry.remove(id);
        registry.remove(id); // second removal must be a no-op
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn admit_after_removal_reports_failure() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        let id = registry.add(tx);
        registry.remove(id);

        assert!(!registry.admit(id, TenantId::new()));
    }

    #[tokio::test]
    async fn send_to_closed_connection_is_swallowed() {
        let registry = ConnectionRegistry::new();
        let tenant = TenantId::new();

        let (tx_live, mut rx_live) = channel();
        let (tx_dead, rx_dead) = channel();
        let live = registry.add(tx_live);
        let dead = registry.add(tx_dead);
        registry.admit(live, tenant);
        registry.admit(dead, tenant);
        drop(rx_dead); // receiver gone: the connection closed

        let delivered = registry
            .broadcast(tenant, ServerMessage::MembersUpdate { members: vec![] })
            .await;

        // The dead connection does not affect delivery to the live one.
        assert_eq!(delivered, 1);
        assert!(rx_live.try_recv().is_ok());
    }

    #[tokio::test]
    async fn group_size_counts_admitted_only() {
        let registry = ConnectionRegistry::new();
        let tenant = TenantId::new();

        let (tx1, _rx1) = channel();
        let (tx2, _rx2) = channel();
        let admitted = registry.add(tx1);
        registry.add(tx2); // stays Connecting
        registry.admit(admitted, tenant);

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.group_size(tenant), 1);
    }
}
