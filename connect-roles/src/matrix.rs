//! Manageable-role matrix
//!
//! The matrix records, for each role, the set of roles it may create, update,
//! delete, or reset passwords for. It is built once at startup and injected
//! into the resolver; there is no mutable global table.

use std::collections::HashMap;

use crate::role::Role;

/// Static table mapping each role to the roles it may manage.
///
/// The default configuration is the one the platform ships with:
///
/// | Manager     | May manage                              |
/// |-------------|-----------------------------------------|
/// | superadmin  | admin, moderateur, collecteur, membre   |
/// | admin       | moderateur, collecteur                  |
/// | moderateur  | collecteur                              |
/// | collecteur  | —                                       |
/// | membre      | —                                       |
///
/// Note that no role manages its own level or above, and that a higher
/// level's set is a superset of any lower level's.
///
/// # Examples
///
/// ```
/// use connect_roles::{Role, RoleMatrix};
///
/// let matrix = RoleMatrix::default();
/// assert!(matrix.allows(Role::Admin, Role::Collecteur));
/// assert!(!matrix.allows(Role::Admin, Role::Admin));
/// assert!(matrix.manageable_roles(Role::Membre).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct RoleMatrix {
    grants: HashMap<Role, Vec<Role>>,
}

impl RoleMatrix {
    /// Build a matrix from explicit grants.
    ///
    /// Roles absent from `grants` manage nothing.
    ///
    /// # Arguments
    ///
    /// * `grants` - Pairs of (manager role, manageable roles)
    pub fn new(grants: impl IntoIterator<Item = (Role, Vec<Role>)>) -> Self {
        Self {
            grants: grants.into_iter().collect(),
        }
    }

    /// The roles `role` may manage.
    ///
    /// # Returns
    ///
    /// The manageable set, empty for roles with no grants
    pub fn manageable_roles(&self, role: Role) -> &[Role] {
        self.grants.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether `manager` may manage accounts with role `target`.
    pub fn allows(&self, manager: Role, target: Role) -> bool {
        self.manageable_roles(manager).contains(&target)
    }
}

impl Default for RoleMatrix {
    fn default() -> Self {
        Self::new([
            (Role::Membre, vec![]),
            (Role::Collecteur, vec![]),
            (Role::Moderateur, vec![Role::Collecteur]),
            (Role::Admin, vec![Role::Moderateur, Role::Collecteur]),
            (
                Role::Superadmin,
                vec![Role::Admin, Role::Moderateur, Role::Collecteur, Role::Membre],
            ),
        ])
    }
}
