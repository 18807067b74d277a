//! Role and tenant-boundary guard stages.
//!
//! These are the pure stages of the request guard chain. The API layer runs
//! them in order (authentication, then role, then tenant boundary) and
//! short-circuits on the first failure. Each stage here is a plain function
//! over a [`Principal`] and per-operation configuration, so the policy is
//! unit-testable without any HTTP machinery.

use congrego_core::TenantId;

use crate::error::GuardError;
use crate::principal::Principal;
use crate::roles::Role;

/// Role stage: succeed iff the principal's role is in the allow-list.
///
/// `None` means the operation declared no allow-list and any authenticated
/// principal passes.
pub fn check_role(principal: &Principal, allow: Option<&[Role]>) -> Result<(), GuardError> {
    match allow {
        None => Ok(()),
        Some(roles) if roles.contains(&principal.role()) => Ok(()),
        Some(_) => Err(GuardError::Forbidden),
    }
}

/// Tenant boundary stage, path-parameter form.
///
/// The requested tenant must equal the principal's tenant. Role is
/// irrelevant here: no role bypasses the boundary.
pub fn check_tenant(principal: &Principal, requested: TenantId) -> Result<(), GuardError> {
    if requested == principal.tenant_id() {
        Ok(())
    } else {
        Err(GuardError::Forbidden)
    }
}

/// A request body that carries (or may omit) a tenant id.
///
/// `with_tenant` returns a new value rather than mutating in place, keeping
/// the guard chain free of hidden mutation. Batch bodies implement this
/// element-wise so every sub-record ends up scoped.
pub trait TenantScoped: Sized {
    /// The tenant id the body's envelope claims, if any.
    fn tenant_id(&self) -> Option<TenantId>;

    /// Every tenant id the body claims, nested elements included.
    ///
    /// The default covers flat bodies. Batch bodies must override this to
    /// expose each element's claim, so that no element can hide behind a
    /// matching envelope.
    fn claimed_tenant_ids(&self) -> Vec<TenantId> {
        self.tenant_id().into_iter().collect()
    }

    /// Return the body re-scoped to the given tenant.
    fn with_tenant(self, tenant_id: TenantId) -> Self;
}

/// Tenant boundary stage, body form.
///
/// Every tenant id the body claims, at any depth, must equal the
/// principal's; one foreign claim rejects the whole body. Omitted ids are
/// back-filled from the principal. Either way the returned value is
/// fully scoped before it reaches business logic; callers never need to
/// (and cannot accidentally) target a foreign tenant on creation.
pub fn scope_to_tenant<B: TenantScoped>(
    principal: &Principal,
    body: B,
) -> Result<B, GuardError> {
    if body
        .claimed_tenant_ids()
        .iter()
        .any(|&claimed| claimed != principal.tenant_id())
    {
        return Err(GuardError::Forbidden);
    }
    Ok(body.with_tenant(principal.tenant_id()))
}
