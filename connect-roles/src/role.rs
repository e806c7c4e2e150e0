//! Role hierarchy
//!
//! This module defines the fixed role enumeration and the ordering between
//! roles that the rest of the platform builds on.

use serde::{Deserialize, Serialize};

/// User role on the platform.
///
/// Roles are hierarchical, with each role outranking the ones below it.
/// The hierarchy is: Membre < Collecteur < Moderateur < Admin < Superadmin
///
/// # Permission Model
///
/// - **Membre**: Regular account; browses, comments, rates, favorites
/// - **Collecteur**: Field contributor; submits points of interest
/// - **Moderateur**: Reviews submissions; approves and rejects POIs
/// - **Admin**: Manages moderators and collectors
/// - **Superadmin**: Full platform control including admin accounts
///
/// # Examples
///
/// ```
/// use connect_roles::Role;
///
/// let role = Role::Collecteur;
/// assert!(!role.can_moderate());
///
/// let moderator = Role::Moderateur;
/// assert!(moderator.can_moderate());
/// assert!(moderator > role);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular member (read, comment, rate)
    Membre = 0,

    /// Field contributor who submits points of interest
    Collecteur = 1,

    /// Reviews and moderates POI submissions
    Moderateur = 2,

    /// Manages moderators and collectors
    Admin = 3,

    /// Full platform control
    Superadmin = 4,
}

impl Role {
    /// Check if this role can moderate POI submissions.
    ///
    /// Moderation covers approving, rejecting, and reapproving points of
    /// interest.
    ///
    /// # Returns
    ///
    /// `true` for Moderateur, Admin, and Superadmin roles
    pub fn can_moderate(&self) -> bool {
        *self >= Role::Moderateur
    }

    /// Check if this role can submit new points of interest.
    ///
    /// # Returns
    ///
    /// `true` for Collecteur and above
    pub fn can_submit(&self) -> bool {
        *self >= Role::Collecteur
    }

    /// The hierarchy level of this role.
    ///
    /// Levels are contiguous integers starting at 0 for Membre.
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_roles::Role;
    ///
    /// assert_eq!(Role::parse("admin"), Some(Role::Admin));
    /// assert_eq!(Role::parse("MODERATEUR"), Some(Role::Moderateur));
    /// assert_eq!(Role::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "membre" => Some(Self::Membre),
            "collecteur" => Some(Self::Collecteur),
            "moderateur" => Some(Self::Moderateur),
            "admin" => Some(Self::Admin),
            "superadmin" => Some(Self::Superadmin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    ///
    /// # Returns
    ///
    /// Lowercase string representation
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_roles::Role;
    ///
    /// assert_eq!(Role::Admin.as_str(), "admin");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Membre => "membre",
            Self::Collecteur => "collecteur",
            Self::Moderateur => "moderateur",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }

    /// Get a human-readable display name for the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_roles::Role;
    ///
    /// assert_eq!(Role::Moderateur.display_name(), "Modérateur");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Membre => "Membre",
            Self::Collecteur => "Collecteur",
            Self::Moderateur => "Modérateur",
            Self::Admin => "Administrateur",
            Self::Superadmin => "Super administrateur",
        }
    }

    /// All roles, ordered from lowest to highest.
    pub fn all() -> [Role; 5] {
        [
            Role::Membre,
            Role::Collecteur,
            Role::Moderateur,
            Role::Admin,
            Role::Superadmin,
        ]
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Membre
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::Superadmin > Role::Admin);
        assert!(Role::Admin > Role::Moderateur);
        assert!(Role::Moderateur > Role::Collecteur);
        assert!(Role::Collecteur > Role::Membre);
    }

    #[test]
    fn test_role_levels_are_contiguous() {
        let levels: Vec<u8> = Role::all().iter().map(|r| r.level()).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_role_permissions() {
        assert!(!Role::Membre.can_submit());
        assert!(Role::Collecteur.can_submit());
        assert!(!Role::Collecteur.can_moderate());
        assert!(Role::Moderateur.can_moderate());
        assert!(Role::Admin.can_moderate());
        assert!(Role::Superadmin.can_moderate());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("SUPERADMIN"), Some(Role::Superadmin));
        assert_eq!(Role::parse("Collecteur"), Some(Role::Collecteur));
        assert_eq!(Role::parse("invalid"), None);
    }

    #[test]
    fn test_role_round_trip() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_default_role() {
        assert_eq!(Role::default(), Role::Membre);
    }
}
