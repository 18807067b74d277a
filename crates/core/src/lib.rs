//! `congrego-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod tenant;

pub use error::{DomainError, DomainResult};
pub use id::{ConnectionId, MemberId, TenantId, UserId};
pub use tenant::Tenant;
