//! Permission resolution
//!
//! Pure predicates over the role matrix. The resolver never errors and has no
//! side effects; callers turn a `false` into their own authorization error.

use crate::actor::Actor;
use crate::matrix::RoleMatrix;
use crate::role::Role;

/// Resolves management permissions against an injected role matrix.
///
/// # Examples
///
/// ```
/// use connect_roles::{Actor, PermissionResolver, Role};
/// use uuid::Uuid;
///
/// let resolver = PermissionResolver::default();
///
/// assert!(resolver.can_manage_role(Role::Superadmin, Role::Admin));
/// assert!(!resolver.can_manage_role(Role::Moderateur, Role::Admin));
///
/// // A user never manages themselves through the management routes.
/// let admin = Actor::new(Uuid::now_v7(), Role::Admin);
/// assert!(!resolver.can_manage_user(&admin, &admin));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver {
    matrix: RoleMatrix,
}

impl PermissionResolver {
    /// Create a resolver over a specific matrix.
    pub fn new(matrix: RoleMatrix) -> Self {
        Self { matrix }
    }

    /// The matrix this resolver consults.
    pub fn matrix(&self) -> &RoleMatrix {
        &self.matrix
    }

    /// Check whether `manager_role` may manage accounts holding `target_role`.
    ///
    /// True iff `target_role` is in the manageable set of `manager_role`.
    pub fn can_manage_role(&self, manager_role: Role, target_role: Role) -> bool {
        self.matrix.allows(manager_role, target_role)
    }

    /// Check whether `manager` may manage the account `target`.
    ///
    /// Always false when `manager` and `target` are the same user, regardless
    /// of role; otherwise delegates to [`can_manage_role`].
    ///
    /// [`can_manage_role`]: Self::can_manage_role
    pub fn can_manage_user(&self, manager: &Actor, target: &Actor) -> bool {
        if manager.id == target.id {
            return false;
        }
        self.can_manage_role(manager.role, target.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// The full 5x5 expectation table for the default matrix, rows ordered
    /// membre, collecteur, moderateur, admin, superadmin.
    const EXPECTED: [[bool; 5]; 5] = [
        [false, false, false, false, false], // membre
        [false, false, false, false, false], // collecteur
        [false, true, false, false, false],  // moderateur
        [false, true, true, false, false],   // admin
        [true, true, true, true, false],     // superadmin
    ];

    #[test]
    fn test_can_manage_role_exhaustive() {
        let resolver = PermissionResolver::default();

        for (i, manager) in Role::all().iter().enumerate() {
            for (j, target) in Role::all().iter().enumerate() {
                assert_eq!(
                    resolver.can_manage_role(*manager, *target),
                    EXPECTED[i][j],
                    "can_manage_role({manager}, {target})"
                );
            }
        }
    }

    #[test]
    fn test_self_management_always_denied() {
        let resolver = PermissionResolver::default();

        for role in Role::all() {
            let actor = Actor::new(Uuid::now_v7(), role);
            assert!(
                !resolver.can_manage_user(&actor, &actor),
                "{role} must not manage itself"
            );
        }
    }

    #[test]
    fn test_can_manage_user_delegates_to_role_check() {
        let resolver = PermissionResolver::default();
        let admin = Actor::new(Uuid::now_v7(), Role::Admin);
        let moderator = Actor::new(Uuid::now_v7(), Role::Moderateur);
        let superadmin = Actor::new(Uuid::now_v7(), Role::Superadmin);

        assert!(resolver.can_manage_user(&admin, &moderator));
        assert!(!resolver.can_manage_user(&admin, &superadmin));
        assert!(!resolver.can_manage_user(&moderator, &admin));
    }

    #[test]
    fn test_resolver_with_custom_matrix() {
        let matrix = RoleMatrix::new([(Role::Admin, vec![Role::Admin])]);
        let resolver = PermissionResolver::new(matrix);

        // Same-role management is allowed by this matrix, but the self guard
        // still applies.
        let a = Actor::new(Uuid::now_v7(), Role::Admin);
        let b = Actor::new(Uuid::now_v7(), Role::Admin);
        assert!(resolver.can_manage_user(&a, &b));
        assert!(!resolver.can_manage_user(&a, &a));
    }
}
