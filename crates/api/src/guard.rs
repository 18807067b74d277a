//! Per-operation guard declarations and HTTP-facing stage adapters.
//!
//! Each operation declares a static allow-list next to its route; `None`
//! means "any authenticated principal". The adapters below run the pure
//! guard stages and translate failures into terminal HTTP responses that
//! leak nothing about the privilege model.

use axum::response::Response;

use congrego_auth::{check_role, check_tenant, scope_to_tenant, Principal, Role, TenantScoped};
use congrego_core::TenantId;

use crate::app::errors;

/// Roles allowed to mutate tenant directories (members, users, families).
pub const DIRECTORY_WRITE: Option<&[Role]> =
    Some(&[Role::Root, Role::SuperAdmin, Role::Admin]);

/// No allow-list: any authenticated principal.
pub const ANY_AUTHENTICATED: Option<&[Role]> = None;

/// Role stage adapter.
pub fn require_role(principal: &Principal, allow: Option<&[Role]>) -> Result<(), Response> {
    check_role(principal, allow).map_err(|_| errors::forbidden())
}

/// Tenant boundary stage adapter, path-parameter form.
pub fn require_tenant(principal: &Principal, requested: TenantId) -> Result<(), Response> {
    check_tenant(principal, requested).map_err(|_| errors::forbidden())
}

/// Tenant boundary stage adapter, body form: returns the validated,
/// fully-scoped body (back-filling a missing tenant id from the principal).
pub fn scope_body<B: TenantScoped>(principal: &Principal, body: B) -> Result<B, Response> {
    scope_to_tenant(principal, body).map_err(|_| errors::forbidden())
}
