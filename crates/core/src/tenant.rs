//! Tenant record: one isolated congregation.

use serde::{Deserialize, Serialize};

use crate::id::TenantId;

/// One congregation.
///
/// # Invariants
/// - `id` is stable and is the only value ever compared at the tenant
///   boundary. Every user, member and tenant-scoped record carries exactly
///   one tenant id, assigned at creation and never reassigned.
/// - `name` and `logo` are display conveniences carried into issued tokens
///   so callers need not re-fetch them on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub logo: String,
}

impl Tenant {
    pub fn new(name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            id: TenantId::new(),
            name: name.into(),
            logo: logo.into(),
        }
    }
}
