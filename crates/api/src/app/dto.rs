//! Request bodies and response shaping.
//!
//! Create-style bodies implement [`TenantScoped`] so the tenant-boundary
//! stage can validate or back-fill their tenant id before any handler logic
//! touches them. Batch bodies scope element-wise.

use serde::Deserialize;

use congrego_auth::{Role, TenantScoped};
use congrego_core::TenantId;
use congrego_store::UserRecord;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<TenantId>,
}

impl TenantScoped for CreateUserRequest {
    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn with_tenant(self, tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            ..self
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<TenantId>,
}

impl TenantScoped for CreateMemberRequest {
    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn with_tenant(self, tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            ..self
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FamilyMemberInput {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<TenantId>,
}

impl TenantScoped for FamilyMemberInput {
    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn with_tenant(self, tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            ..self
        }
    }
}

/// A family registration: several members created together under one tenant.
#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub surname: String,
    #[serde(default)]
    pub members: Vec<FamilyMemberInput>,
    #[serde(rename = "tenantId", default)]
    pub tenant_id: Option<TenantId>,
}

impl TenantScoped for CreateFamilyRequest {
    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn claimed_tenant_ids(&self) -> Vec<TenantId> {
        // Envelope claim plus every element claim: one foreign element
        // poisons the whole request, even behind a matching envelope.
        self.tenant_id
            .into_iter()
            .chain(self.members.iter().filter_map(|m| m.tenant_id))
            .collect()
    }

    fn with_tenant(self, tenant_id: TenantId) -> Self {
        Self {
            surname: self.surname,
            members: self
                .members
                .into_iter()
                .map(|m| m.with_tenant(tenant_id))
                .collect(),
            tenant_id: Some(tenant_id),
        }
    }
}

/// Public shape of a user account. The password hash never leaves the store
/// layer.
pub fn user_json(user: &UserRecord) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "tenantId": user.tenant_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_batch_exposes_every_element_claim() {
        let envelope = TenantId::new();
        let foreign = TenantId::new();
        let req = CreateFamilyRequest {
            surname: "Pérez".into(),
            members: vec![
                FamilyMemberInput {
                    first_name: "Luis".into(),
                    last_name: "Pérez".into(),
                    tenant_id: None,
                },
                FamilyMemberInput {
                    first_name: "Marta".into(),
                    last_name: "Pérez".into(),
                    tenant_id: Some(foreign),
                },
            ],
            tenant_id: Some(envelope),
        };

        // Both the envelope claim and the element claim must surface; the
        // matching envelope must not shadow the foreign element.
        assert_eq!(req.claimed_tenant_ids(), vec![envelope, foreign]);
    }

    #[test]
    fn family_back_fill_scopes_every_element() {
        let tenant = TenantId::new();
        let req = CreateFamilyRequest {
            surname: "Pérez".into(),
            members: vec![
                FamilyMemberInput {
                    first_name: "Luis".into(),
                    last_name: "Pérez".into(),
                    tenant_id: None,
                },
                FamilyMemberInput {
                    first_name: "Marta".into(),
                    last_name: "Pérez".into(),
                    tenant_id: None,
                },
            ],
            tenant_id: None,
        };

        let scoped = req.with_tenant(tenant);
        assert_eq!(scoped.tenant_id, Some(tenant));
        assert!(scoped.members.iter().all(|m| m.tenant_id == Some(tenant)));
    }

    #[test]
    fn user_json_never_contains_the_password_hash() {
        let user = UserRecord {
            id: congrego_core::UserId::new(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Admin,
            tenant_id: TenantId::new(),
        };

        let json = user_json(&user).to_string();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
