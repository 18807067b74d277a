//! User account record.

use congrego_auth::Role;
use congrego_core::{TenantId, UserId};

/// A stored user account.
///
/// # Invariants
/// - `email` is unique across the whole system, not just within the tenant.
/// - `tenant_id` is assigned at creation and never reassigned.
/// - `password_hash` is opaque to everything except the hashing contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: TenantId,
}
