//! In-memory store (dev/test wiring).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use congrego_core::{MemberId, Tenant, TenantId, UserId};

use crate::credential::{CredentialStore, NewUser};
use crate::error::StoreError;
use crate::member::{MemberDirectory, MemberRecord, NewMember};
use crate::user::UserRecord;

#[derive(Default)]
struct Inner {
    tenants: HashMap<TenantId, Tenant>,
    users: HashMap<UserId, UserRecord>,
    members: HashMap<MemberId, MemberRecord>,
}

/// In-memory credential store and member directory.
///
/// Lookups are hash-map indexed, so the per-request `find_user_by_id` on
/// the authentication path stays O(1).
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant. Returns the stored record.
    pub fn add_tenant(&self, tenant: Tenant) -> Tenant {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.tenants.insert(tenant.id, tenant.clone());
        tenant
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_id(&self, id: UserId) -> Result<UserRecord, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.users.get(&id).cloned().ok_or(StoreError::UserNotFound)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, StoreError> {
        let email = normalize_email(email);
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::UserNotFound)
    }

    async fn find_tenant(&self, id: TenantId) -> Result<Tenant, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .tenants
            .get(&id)
            .cloned()
            .ok_or(StoreError::TenantNotFound)
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let email = normalize_email(&user.email);
        let mut inner = self.inner.write().expect("store lock poisoned");

        if !inner.tenants.contains_key(&user.tenant_id) {
            return Err(StoreError::TenantNotFound);
        }
        // Global uniqueness: the check deliberately ignores tenant_id.
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::EmailTaken);
        }

        let record = UserRecord {
            id: UserId::new(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            tenant_id: user.tenant_id,
        };
        inner.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::UserNotFound)
    }

    async fn list_tenants(&self) -> Vec<Tenant> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.tenants.values().cloned().collect()
    }
}

#[async_trait]
impl MemberDirectory for MemoryStore {
    async fn create_member(&self, member: NewMember) -> Result<MemberRecord, StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        if !inner.tenants.contains_key(&member.tenant_id) {
            return Err(StoreError::TenantNotFound);
        }

        let record = MemberRecord {
            id: MemberId::new(),
            tenant_id: member.tenant_id,
            first_name: member.first_name,
            last_name: member.last_name,
            active: true,
        };
        inner.members.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_members(&self, tenant_id: TenantId) -> Vec<MemberRecord> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut members: Vec<_> = inner
            .members
            .values()
            .filter(|m| m.tenant_id == tenant_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.as_uuid().cmp(b.id.as_uuid()));
        members
    }

    async fn remove_member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        match inner.members.get(&member_id) {
            Some(m) if m.tenant_id == tenant_id => {
                inner.members.remove(&member_id);
                Ok(())
            }
            _ => Err(StoreError::MemberNotFound),
        }
    }
}
