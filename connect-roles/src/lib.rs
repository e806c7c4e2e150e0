//! # Connect Roles
//!
//! This crate provides the fixed role hierarchy and permission resolution
//! for the yaoundeConnect platform, shared by the moderation workflow and
//! the account management flows.
//!
//! ## Overview
//!
//! The connect-roles crate handles:
//! - **Roles**: The ordered, fixed role enumeration
//! - **Role Matrix**: Which roles each role may manage
//! - **Permission Resolver**: Pure authorization predicates
//! - **Actors**: The authenticated principal handed in by the API layer
//!
//! ## Role Hierarchy
//!
//! Roles are hierarchical, with each role outranking the ones below it:
//!
//! ```text
//! membre < collecteur < moderateur < admin < superadmin
//! ```
//!
//! The hierarchy is total and fixed at compile time; there are no dynamic
//! roles.
//!
//! ## Usage
//!
//! ```rust
//! use connect_roles::{Actor, PermissionResolver, Role};
//! use uuid::Uuid;
//!
//! let resolver = PermissionResolver::default();
//!
//! // Role-level checks
//! assert!(resolver.can_manage_role(Role::Admin, Role::Collecteur));
//! assert!(!resolver.can_manage_role(Role::Admin, Role::Superadmin));
//!
//! // User-level checks (includes the self-management guard)
//! let admin = Actor::new(Uuid::now_v7(), Role::Admin);
//! let collector = Actor::new(Uuid::now_v7(), Role::Collecteur);
//! assert!(resolver.can_manage_user(&admin, &collector));
//! assert!(!resolver.can_manage_user(&admin, &admin));
//! ```
//!
//! ## Alternate hierarchies
//!
//! The manageable-role table is an immutable structure injected into the
//! resolver at construction time, so tests (and future deployments) can run
//! against an alternate matrix without touching global state:
//!
//! ```rust
//! use connect_roles::{PermissionResolver, Role, RoleMatrix};
//!
//! let matrix = RoleMatrix::new([
//!     (Role::Membre, vec![]),
//!     (Role::Collecteur, vec![]),
//!     (Role::Moderateur, vec![Role::Membre]),
//!     (Role::Admin, vec![Role::Membre, Role::Collecteur]),
//!     (Role::Superadmin, vec![Role::Admin]),
//! ]);
//! let resolver = PermissionResolver::new(matrix);
//! assert!(resolver.can_manage_role(Role::Moderateur, Role::Membre));
//! ```

pub mod actor;
pub mod matrix;
pub mod resolver;
pub mod role;

// Re-export main types for convenience
pub use actor::Actor;
pub use matrix::RoleMatrix;
pub use resolver::PermissionResolver;
pub use role::Role;
