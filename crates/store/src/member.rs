//! Member directory contract.
//!
//! Members are the business entities whose list the realtime layer keeps
//! live on connected clients. Only the fields needed for tenant scoping and
//! display are modeled here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use congrego_core::{MemberId, TenantId};

use crate::error::StoreError;

/// A stored congregation member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    #[serde(rename = "tenantId")]
    pub tenant_id: TenantId,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub active: bool,
}

/// Input for creating a member. The tenant id is mandatory here: the
/// tenant-boundary stage has already back-filled it by the time a create
/// reaches the store.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub tenant_id: TenantId,
    pub first_name: String,
    pub last_name: String,
}

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn create_member(&self, member: NewMember) -> Result<MemberRecord, StoreError>;

    async fn list_members(&self, tenant_id: TenantId) -> Vec<MemberRecord>;

    /// Remove a member. The tenant id is part of the key: a member id from
    /// another tenant is simply not found.
    async fn remove_member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<(), StoreError>;
}
