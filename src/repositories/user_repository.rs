use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{User, UserRole},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Sets `role` to `new_role` only where the record still has `expected_role`.
    /// Returns the number of matched records.
    async fn compare_and_set_role(
        &self,
        email: &str,
        expected_role: UserRole,
        new_role: UserRole,
    ) -> AppResult<u64>;

    async fn insert(&self, user: User) -> AppResult<User>;

    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn compare_and_set_role(
        &self,
        email: &str,
        expected_role: UserRole,
        new_role: UserRole,
    ) -> AppResult<u64> {
        let update = doc! { "$set": { "role": new_role.as_str() } };

        let result = self
            .collection
            .update_one(role_guarded_filter(email, expected_role), update)
            .await?;
        Ok(result.matched_count)
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name("email_unique".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Ensured unique index on users.email");

        Ok(())
    }
}

/// Matches the record only while it still holds `expected_role`.
fn role_guarded_filter(email: &str, expected_role: UserRole) -> Document {
    doc! { "email": email, "role": expected_role.as_str() }
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}
