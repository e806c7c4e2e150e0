//! User management flows
//!
//! Every operation resolves its permission before opening a transaction,
//! writes its audit entry inside the transaction, and notifies after commit.

use connect_audit::{AuditAction, AuditEntry, AuditQuery};
use connect_events::{AccountEvent, NotificationDispatcher};
use connect_roles::{Actor, PermissionResolver, Role};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::store::UserStore;
use crate::user::{NewUser, User};

/// Audit table name for user accounts.
pub const USER_TABLE: &str = "users";

/// The account management service.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    resolver: PermissionResolver,
    dispatcher: NotificationDispatcher,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish()
    }
}

impl AccountService {
    /// Create the service from its collaborators.
    pub fn new(
        store: Arc<dyn UserStore>,
        resolver: PermissionResolver,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            resolver,
            dispatcher,
        }
    }

    /// Create a user account with a managed role.
    ///
    /// The actor must be allowed to manage `new.role`; the check runs before
    /// any persistence write.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Authorization`] if `new.role` is not manageable by
    ///   the actor
    /// - [`AccountError::Validation`] if name or email are malformed
    /// - [`AccountError::EmailTaken`] if the email already has an account
    pub async fn create_user(&self, actor: &Actor, new: NewUser) -> AccountResult<User> {
        if !self.resolver.can_manage_role(actor.role, new.role) {
            return Err(AccountError::Authorization(format!(
                "role {} cannot create {} accounts",
                actor.role, new.role
            )));
        }
        Self::validate_profile(&new.name, &new.email)?;

        let user = User::new(new);

        let mut tx = self.store.begin().await?;
        if tx.find_by_email(&user.email).await?.is_some() {
            tx.rollback().await?;
            return Err(AccountError::EmailTaken);
        }
        tx.insert(user.clone());
        tx.record_audit(
            AuditEntry::new(USER_TABLE, user.id, AuditAction::Create, actor.id)
                .with_new_values(json!({
                    "name": user.name,
                    "email": user.email,
                    "role": user.role,
                })),
        );
        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, created_by = %actor.id, "user created");

        self.dispatcher
            .dispatch(
                AccountEvent::Created {
                    user_id: user.id,
                    role: user.role,
                    created_by: actor.id,
                }
                .to_event(),
            )
            .await;

        Ok(user)
    }

    /// Change a user's role.
    ///
    /// The actor must be allowed to manage the target user (which excludes
    /// themselves) and to manage both the current and the new role.
    pub async fn change_role(
        &self,
        actor: &Actor,
        target_id: Uuid,
        new_role: Role,
    ) -> AccountResult<User> {
        let mut tx = self.store.begin().await?;
        let Some(mut user) = tx.find(target_id).await? else {
            tx.rollback().await?;
            return Err(AccountError::NotFound(target_id));
        };

        let target = Actor::new(user.id, user.role);
        if !self.resolver.can_manage_user(actor, &target)
            || !self.resolver.can_manage_role(actor.role, new_role)
        {
            tx.rollback().await?;
            return Err(AccountError::Authorization(format!(
                "role {} cannot move user from {} to {}",
                actor.role, user.role, new_role
            )));
        }

        let old_role = user.role;
        user.role = new_role;
        user.updated_at = chrono::Utc::now();

        tx.update(user.clone());
        tx.record_audit(
            AuditEntry::new(USER_TABLE, user.id, AuditAction::Update, actor.id)
                .with_old_values(json!({ "role": old_role }))
                .with_new_values(json!({ "role": new_role })),
        );
        tx.commit().await?;

        tracing::info!(user_id = %user.id, %old_role, %new_role, changed_by = %actor.id, "role changed");

        self.dispatcher
            .dispatch(
                AccountEvent::RoleChanged {
                    user_id: user.id,
                    old_role,
                    new_role,
                    changed_by: actor.id,
                }
                .to_event(),
            )
            .await;

        Ok(user)
    }

    /// Delete a user account.
    ///
    /// The deleted state is captured in the audit entry's `old_values`.
    pub async fn delete_user(&self, actor: &Actor, target_id: Uuid) -> AccountResult<()> {
        let mut tx = self.store.begin().await?;
        let Some(user) = tx.find(target_id).await? else {
            tx.rollback().await?;
            return Err(AccountError::NotFound(target_id));
        };

        let target = Actor::new(user.id, user.role);
        if !self.resolver.can_manage_user(actor, &target) {
            tx.rollback().await?;
            return Err(AccountError::Authorization(format!(
                "role {} cannot delete {} accounts",
                actor.role, user.role
            )));
        }

        tx.delete(user.id);
        tx.record_audit(
            AuditEntry::new(USER_TABLE, user.id, AuditAction::Delete, actor.id)
                .with_old_values(json!({
                    "name": user.name,
                    "email": user.email,
                    "role": user.role,
                })),
        );
        tx.commit().await?;

        tracing::info!(user_id = %user.id, deleted_by = %actor.id, "user deleted");

        self.dispatcher
            .dispatch(
                AccountEvent::Deleted {
                    user_id: user.id,
                    deleted_by: actor.id,
                }
                .to_event(),
            )
            .await;

        Ok(())
    }

    /// Request a password reset on behalf of a user.
    ///
    /// Credentials live with the external auth provider; this records the
    /// request in the audit trail and emits the event the email layer
    /// listens for.
    pub async fn request_password_reset(
        &self,
        actor: &Actor,
        target_id: Uuid,
    ) -> AccountResult<()> {
        let mut tx = self.store.begin().await?;
        let Some(user) = tx.find(target_id).await? else {
            tx.rollback().await?;
            return Err(AccountError::NotFound(target_id));
        };

        let target = Actor::new(user.id, user.role);
        if !self.resolver.can_manage_user(actor, &target) {
            tx.rollback().await?;
            return Err(AccountError::Authorization(format!(
                "role {} cannot reset passwords for {} accounts",
                actor.role, user.role
            )));
        }

        tx.record_audit(
            AuditEntry::new(USER_TABLE, user.id, AuditAction::Update, actor.id)
                .with_new_values(json!({ "password_reset": "requested" })),
        );
        tx.commit().await?;

        self.dispatcher
            .dispatch(
                AccountEvent::PasswordResetRequested {
                    user_id: user.id,
                    requested_by: actor.id,
                }
                .to_event(),
            )
            .await;

        Ok(())
    }

    /// Fetch a user by ID.
    pub async fn get(&self, user_id: Uuid) -> AccountResult<User> {
        self.store
            .find(user_id)
            .await?
            .ok_or(AccountError::NotFound(user_id))
    }

    /// The audit history of a user account, newest first.
    pub async fn history(&self, user_id: Uuid) -> AccountResult<Vec<AuditEntry>> {
        Ok(self.store.history(USER_TABLE, user_id).await)
    }

    fn validate_profile(name: &str, email: &str) -> AccountResult<()> {
        if name.trim().is_empty() {
            return Err(AccountError::Validation("name must not be blank".into()));
        }
        // Shape check only; deliverability is the email layer's concern.
        let valid_email = email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
        if !valid_email {
            return Err(AccountError::Validation(format!(
                "invalid email address: {email}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use connect_events::{EventBus, MemoryEventBus};

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryUserStore::new()),
            PermissionResolver::default(),
            NotificationDispatcher::new(Arc::new(MemoryEventBus::new())),
        )
    }

    fn admin() -> Actor {
        Actor::new(Uuid::now_v7(), Role::Admin)
    }

    #[tokio::test]
    async fn test_admin_creates_collector() {
        let service = service();
        let actor = admin();

        let user = service
            .create_user(&actor, NewUser::new("Amina", "amina@example.cm", Role::Collecteur))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Collecteur);
        let history = service.history(user.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AuditAction::Create);
        assert_eq!(history[0].actor_id, actor.id);
    }

    #[tokio::test]
    async fn test_admin_cannot_create_superadmin() {
        let service = service();

        let err = service
            .create_user(
                &admin(),
                NewUser::new("Eve", "eve@example.cm", Role::Superadmin),
            )
            .await
            .unwrap_err();

        // Refused before any persistence write.
        assert!(matches!(err, AccountError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let service = service();
        let actor = Actor::new(Uuid::now_v7(), Role::Superadmin);

        service
            .create_user(&actor, NewUser::new("Paul", "paul@example.cm", Role::Membre))
            .await
            .unwrap();
        let err = service
            .create_user(&actor, NewUser::new("Paula", "PAUL@example.cm", Role::Membre))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::EmailTaken));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let service = service();

        let err = service
            .create_user(&admin(), NewUser::new("Paul", "not-an-email", Role::Collecteur))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[tokio::test]
    async fn test_change_role_requires_both_roles_manageable() {
        let service = service();
        let superadmin = Actor::new(Uuid::now_v7(), Role::Superadmin);
        let user = service
            .create_user(
                &superadmin,
                NewUser::new("Luc", "luc@example.cm", Role::Collecteur),
            )
            .await
            .unwrap();

        // A moderator manages collectors but cannot grant moderator.
        let moderator = Actor::new(Uuid::now_v7(), Role::Moderateur);
        let err = service
            .change_role(&moderator, user.id, Role::Moderateur)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Authorization(_)));

        // An admin manages both sides of the move.
        let updated = service
            .change_role(&admin(), user.id, Role::Moderateur)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Moderateur);

        let history = service.history(user.id).await.unwrap();
        assert_eq!(history[0].old_values["role"], "collecteur");
        assert_eq!(history[0].new_values["role"], "moderateur");
    }

    #[tokio::test]
    async fn test_actor_cannot_manage_self() {
        let service = service();
        let superadmin = Actor::new(Uuid::now_v7(), Role::Superadmin);
        let user = service
            .create_user(
                &superadmin,
                NewUser::new("Self Admin", "self@example.cm", Role::Admin),
            )
            .await
            .unwrap();

        // The created admin acts on their own account.
        let as_actor = Actor::new(user.id, user.role);
        let err = service
            .request_password_reset(&as_actor, user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_delete_user_audits_final_state() {
        let service = service();
        let superadmin = Actor::new(Uuid::now_v7(), Role::Superadmin);
        let user = service
            .create_user(
                &superadmin,
                NewUser::new("Gone", "gone@example.cm", Role::Membre),
            )
            .await
            .unwrap();

        service.delete_user(&superadmin, user.id).await.unwrap();

        assert!(matches!(
            service.get(user.id).await.unwrap_err(),
            AccountError::NotFound(_)
        ));
        let history = service.history(user.id).await.unwrap();
        assert_eq!(history[0].action, AuditAction::Delete);
        assert_eq!(history[0].old_values["email"], "gone@example.cm");
    }

    #[tokio::test]
    async fn test_password_reset_emits_event() {
        let bus = Arc::new(MemoryEventBus::new());
        let service = AccountService::new(
            Arc::new(MemoryUserStore::new()),
            PermissionResolver::default(),
            NotificationDispatcher::new(bus.clone()),
        );
        let superadmin = Actor::new(Uuid::now_v7(), Role::Superadmin);
        let user = service
            .create_user(
                &superadmin,
                NewUser::new("Reset Me", "reset@example.cm", Role::Collecteur),
            )
            .await
            .unwrap();

        let mut sub = bus.subscribe("account.password_reset_requested").await.unwrap();
        service
            .request_password_reset(&superadmin, user.id)
            .await
            .unwrap();

        let event = tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.subject_id, Some(user.id));
    }
}
