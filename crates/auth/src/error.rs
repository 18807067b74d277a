//! Guard-chain error taxonomy.

use thiserror::Error;

/// Failure of a guard stage.
///
/// The display strings are deliberately information-free: `Unauthorized`
/// must not reveal whether a signature or a revocation check failed, and
/// `Forbidden` must not reveal which roles or tenant would have been
/// acceptable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GuardError {
    /// No valid, live principal could be established.
    #[error("unauthorized")]
    Unauthorized,

    /// Principal established, but the role or tenant boundary check failed.
    #[error("forbidden")]
    Forbidden,
}
