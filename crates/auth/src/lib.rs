//! `congrego-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it signs and
//! verifies tokens, models the authenticated principal, and provides the
//! role and tenant-boundary guard stages as pure functions. Wiring the
//! stages into a request pipeline is the API layer's job.

pub mod claims;
pub mod error;
pub mod guard;
pub mod principal;
pub mod roles;
pub mod token;

pub use claims::{Claims, TOKEN_TTL_SECS};
pub use error::GuardError;
pub use guard::{check_role, check_tenant, scope_to_tenant, TenantScoped};
pub use principal::Principal;
pub use roles::Role;
pub use token::{TokenCodec, TokenError};
