//! The authenticated identity attached to a request or connection.

use congrego_core::{TenantId, UserId};

use crate::claims::Claims;
use crate::roles::Role;

/// Authenticated identity for the duration of one request or connection.
///
/// Constructed fresh from verified claims, never persisted, immutable after
/// construction. The tenant display fields are issuance-time snapshots; only
/// `tenant_id` participates in boundary decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    name: String,
    role: Role,
    tenant_id: TenantId,
    tenant_name: String,
    tenant_logo: String,
}

impl Principal {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
            tenant_id: claims.tenant_id,
            tenant_name: claims.tenant_name,
            tenant_logo: claims.tenant_logo,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn tenant_name(&self) -> &str {
        &self.tenant_name
    }

    pub fn tenant_logo(&self) -> &str {
        &self.tenant_logo
    }
}
