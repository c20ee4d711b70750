use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};

use models::user;
use crate::errors::ServiceError;
use crate::users::service::UserService;

/// SeaORM-backed service. Mutations run inside their own transaction.
pub struct SeaOrmUserService {
    db: DatabaseConnection,
}

impl SeaOrmUserService {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn get_all_users(&self) -> Result<Vec<user::Model>, ServiceError> {
        // 读操作直接走连接池，不开事务
        Ok(user::find_all(&self.db).await?)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_id(&self.db, id).await?)
    }

    #[instrument(skip(self, draft), fields(user_id = ?draft.id))]
    async fn save_user(&self, draft: user::Draft) -> Result<user::Model, ServiceError> {
        // dropping the transaction on any `?` below rolls it back
        // 存在性检查与写入在同一事务内完成
        let txn = self.db.begin().await?;
        let saved = user::save(&txn, draft).await?;
        txn.commit().await?;
        info!(user_id = saved.id, "user_saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let removed = user::delete_by_id(&txn, id).await?;
        txn.commit().await?;
        info!(user_id = id, removed, "user_deleted");
        Ok(())
    }
}
