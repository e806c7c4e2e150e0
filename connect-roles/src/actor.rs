//! Authenticated actor
//!
//! The actor is the `{id, role}` pair the API layer's auth middleware hands to
//! the core after verifying credentials. The core trusts it and never
//! re-verifies tokens itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// An authenticated principal performing an operation.
///
/// # Examples
///
/// ```
/// use connect_roles::{Actor, Role};
/// use uuid::Uuid;
///
/// let moderator = Actor::new(Uuid::now_v7(), Role::Moderateur);
/// assert!(moderator.role.can_moderate());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    /// User ID of the principal
    pub id: Uuid,

    /// Role the principal holds
    pub role: Role,
}

impl Actor {
    /// Create an actor from an id and role.
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_creation() {
        let id = Uuid::now_v7();
        let actor = Actor::new(id, Role::Admin);

        assert_eq!(actor.id, id);
        assert_eq!(actor.role, Role::Admin);
    }
}
