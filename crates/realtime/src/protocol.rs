//! Wire protocol for the realtime channel.

use serde::{Deserialize, Serialize};

use congrego_core::ConnectionId;
use congrego_store::MemberRecord;

/// Server-to-client messages, sent as JSON text frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Handshake acknowledgement once a connection is admitted.
    Connected {
        #[serde(rename = "connectionId")]
        connection_id: ConnectionId,
    },

    /// The tenant's refreshed member list after a mutation.
    MembersUpdate { members: Vec<MemberRecord> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_update_uses_kebab_case_event_name() {
        let msg = ServerMessage::MembersUpdate { members: vec![] };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "members-update");
        assert!(json["data"]["members"].as_array().unwrap().is_empty());
    }
}
