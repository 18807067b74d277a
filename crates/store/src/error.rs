//! Store error model.
//!
//! These errors stay inside the store contract: route handlers map them to
//! HTTP statuses, and the authentication stage collapses `UserNotFound`
//! into the uniform unauthorized outcome.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user not found")]
    UserNotFound,

    #[error("tenant not found")]
    TenantNotFound,

    #[error("member not found")]
    MemberNotFound,

    /// Email uniqueness is global across all tenants: a person has one
    /// login regardless of which tenant manages them operationally.
    #[error("email already in use")]
    EmailTaken,
}
