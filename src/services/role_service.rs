use std::sync::Arc;

use crate::{
    errors::{AppResult, RoleTransitionError},
    models::domain::UserRole,
    repositories::UserRepository,
};

/// The user performing a role change, as known from their session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub email: Option<String>,
}

impl Actor {
    pub fn from_user_id(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChange {
    pub from: UserRole,
    pub to: UserRole,
    pub matched: u64,
}

/// Moves identities between `user` and `super_user`. Admins are never entered or left.
pub struct RoleTransitionService {
    users: Arc<dyn UserRepository>,
}

impl RoleTransitionService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn promote(&self, actor: &Actor, target_email: &str) -> AppResult<RoleChange> {
        self.transition(actor, target_email, UserRole::User, UserRole::SuperUser)
            .await
    }

    pub async fn demote(&self, actor: &Actor, target_email: &str) -> AppResult<RoleChange> {
        self.transition(actor, target_email, UserRole::SuperUser, UserRole::User)
            .await
    }

    async fn transition(
        &self,
        actor: &Actor,
        target_email: &str,
        from: UserRole,
        to: UserRole,
    ) -> AppResult<RoleChange> {
        if actor.email.as_deref() == Some(target_email) {
            return Err(RoleTransitionError::SelfModification.into());
        }

        let target = self
            .users
            .find_by_email(target_email)
            .await?
            .ok_or(RoleTransitionError::TargetNotFound)?;

        if target.user_id == actor.user_id {
            return Err(RoleTransitionError::SelfModification.into());
        }
        if target.role == UserRole::Admin {
            return Err(RoleTransitionError::AdminImmutable.into());
        }
        if target.role == to {
            return Err(RoleTransitionError::AlreadyAtTarget(to.as_str()).into());
        }

        // Matching on the role read above makes the write a compare-and-set.
        let matched = self
            .users
            .compare_and_set_role(target_email, from, to)
            .await?;

        match matched {
            1 => {
                log::info!(
                    "user_id={} changed role of user_id={} from {} to {}",
                    actor.user_id,
                    target.user_id,
                    from,
                    to
                );
                Ok(RoleChange { from, to, matched })
            }
            0 => {
                log::warn!(
                    "Role of user_id={} changed before the update could apply",
                    target.user_id
                );
                Err(RoleTransitionError::TargetNotFound.into())
            }
            n => {
                log::error!("Role update for one email matched {} records", n);
                Err(RoleTransitionError::StoreConflict.into())
            }
        }
    }
}
