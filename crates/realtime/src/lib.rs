//! `congrego-realtime`: tenant-scoped realtime push layer.
//!
//! A websocket gateway authenticates each connection at handshake time with
//! the same token codec as the HTTP path, assigns it to a broadcast group
//! named by its verified tenant id, and fans member-list change events out
//! to that group only. Delivery is best-effort: a send to a connection that
//! closed mid-broadcast is swallowed.

pub mod gateway;
pub mod protocol;
pub mod registry;

pub use gateway::{router, GatewayState, HANDSHAKE_HEADER};
pub use protocol::ServerMessage;
pub use registry::ConnectionRegistry;
