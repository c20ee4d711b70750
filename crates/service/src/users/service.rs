use async_trait::async_trait;

use models::user;
use crate::errors::ServiceError;

/// Application service for user records.
///
/// Mirrors the store one to one. Implementations make `save_user` and
/// `delete_user` atomic; reads carry no isolation guarantee.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_all_users(&self) -> Result<Vec<user::Model>, ServiceError>;

    /// `None` when no user has this id.
    async fn get_user_by_id(&self, id: i64) -> Result<Option<user::Model>, ServiceError>;

    /// Create (no id) or overwrite (id set) a user and return the stored row.
    async fn save_user(&self, draft: user::Draft) -> Result<user::Model, ServiceError>;

    /// Removing an id that does not exist succeeds.
    async fn delete_user(&self, id: i64) -> Result<(), ServiceError>;
}
