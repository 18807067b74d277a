//! `congrego-store`: credential store contract and in-memory backing.
//!
//! The credential store is the single source of truth for "does this
//! principal still exist and what tenant does it belong to". The
//! authentication stage hits `find_user_by_id` on every request, which is
//! what makes deleting a user row an instant, list-free revocation of all
//! of that user's outstanding tokens.

pub mod credential;
pub mod error;
pub mod member;
pub mod memory;
pub mod password;
pub mod user;

pub use credential::{CredentialStore, NewUser};
pub use error::StoreError;
pub use member::{MemberDirectory, MemberRecord, NewMember};
pub use memory::MemoryStore;
pub use password::{Argon2Hasher, PasswordError, PasswordHasher};
pub use user::UserRecord;
