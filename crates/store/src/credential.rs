//! Credential store contract.

use async_trait::async_trait;

use congrego_auth::Role;
use congrego_core::{Tenant, TenantId, UserId};

use crate::error::StoreError;
use crate::user::UserRecord;

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: TenantId,
}

/// Read/write contract the auth core depends on.
///
/// `find_user_by_id` runs on every authenticated request and must be fast
/// (indexed / O(1)); `find_user_by_email` is only hit at login time.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_id(&self, id: UserId) -> Result<UserRecord, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, StoreError>;

    async fn find_tenant(&self, id: TenantId) -> Result<Tenant, StoreError>;

    /// Create a user. Fails with [`StoreError::EmailTaken`] if the email is
    /// already in use anywhere in the system, or
    /// [`StoreError::TenantNotFound`] if the target tenant does not exist.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Delete a user. This is the revocation primitive: every outstanding
    /// token for the user is rejected on the very next request.
    async fn delete_user(&self, id: UserId) -> Result<(), StoreError>;

    async fn list_tenants(&self) -> Vec<Tenant>;
}
