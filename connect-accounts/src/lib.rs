//! # Connect Accounts
//!
//! Role-guarded user management for the yaoundeConnect platform.
//!
//! Administrative operations on accounts (creating users, changing roles,
//! deleting, requesting password resets) are gated by the manageable-role
//! matrix from `connect-roles`: an actor may only manage accounts whose role
//! is in their manageable set, and never their own account. Every guard is
//! evaluated before any persistence write; every mutation writes its audit
//! entry in the same store transaction; every commit is followed by a
//! best-effort account event.
//!
//! Credential storage and verification belong to the external auth provider —
//! this crate never sees a password.

pub mod error;
pub mod service;
pub mod store;
pub mod user;

// Re-export main types for convenience
pub use error::{AccountError, AccountResult};
pub use service::{AccountService, USER_TABLE};
pub use store::{MemoryUserStore, StoreError, StoreResult, UserStore, UserTransaction};
pub use user::{NewUser, User};
