//! Token claims model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use congrego_core::{Tenant, TenantId, UserId};

use crate::roles::Role;

/// Token lifetime: exactly 7 days from issuance.
pub const TOKEN_TTL_SECS: i64 = 604_800;

/// Claims carried by a signed token.
///
/// The tenant display fields (`tenant_name`, `tenant_logo`) are a
/// convenience copy taken at issuance so callers need not re-fetch them on
/// every request. They may go stale until the token naturally expires; the
/// tenant *id* is the only field ever used for boundary decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user this token was issued to.
    pub sub: UserId,

    /// Display name of the subject.
    pub name: String,

    /// Role of the subject within its tenant.
    pub role: Role,

    /// Tenant the subject belongs to.
    #[serde(rename = "tenantId")]
    pub tenant_id: TenantId,

    /// Tenant display name (issuance-time snapshot).
    #[serde(rename = "tenantName")]
    pub tenant_name: String,

    /// Tenant logo reference (issuance-time snapshot).
    #[serde(rename = "tenantLogo")]
    pub tenant_logo: String,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiry, unix seconds. Always `iat + TOKEN_TTL_SECS` at issuance.
    pub exp: i64,
}

impl Claims {
    /// Build claims for a subject at an explicit issuance instant.
    ///
    /// The expiry is computed here and nowhere else, so a token's window is
    /// always exactly [`TOKEN_TTL_SECS`] wide.
    pub fn issue_at(
        sub: UserId,
        name: impl Into<String>,
        role: Role,
        tenant: &Tenant,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub,
            name: name.into(),
            role,
            tenant_id: tenant.id,
            tenant_name: tenant.name.clone(),
            tenant_logo: tenant.logo.clone(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }

    /// Build claims for a subject issued now.
    pub fn issue(sub: UserId, name: impl Into<String>, role: Role, tenant: &Tenant) -> Self {
        Self::issue_at(sub, name, role, tenant, Utc::now())
    }
}
