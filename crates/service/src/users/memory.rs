use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use models::user;
use crate::errors::ServiceError;
use crate::users::service::UserService;

/// In-process service for tests and database-less runs.
///
/// Same upsert rules as the SQL store: ids are generated past the highest id
/// ever stored, an unknown explicit id is inserted as is.
#[derive(Default)]
pub struct InMemoryUserService {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    rows: BTreeMap<i64, user::Model>,
    last_id: i64,
}

impl InMemoryUserService {
    pub fn new() -> Self { Self::default() }

    /// Service pre-populated through `save_user` semantics.
    pub async fn with_users(drafts: impl IntoIterator<Item = user::Draft>) -> Result<Self, ServiceError> {
        let svc = Self::new();
        for d in drafts {
            svc.save_user(d).await?;
        }
        Ok(svc)
    }
}

#[async_trait]
impl UserService for InMemoryUserService {
    async fn get_all_users(&self) -> Result<Vec<user::Model>, ServiceError> {
        Ok(self.state.lock().await.rows.values().cloned().collect())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<user::Model>, ServiceError> {
        Ok(self.state.lock().await.rows.get(&id).cloned())
    }

    async fn save_user(&self, draft: user::Draft) -> Result<user::Model, ServiceError> {
        let mut state = self.state.lock().await;
        let id = match draft.id {
            Some(id) => id,
            None => state.last_id + 1,
        };
        state.last_id = state.last_id.max(id);
        let row = user::Model { id, name: draft.name, email: draft.email };
        state.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        self.state.lock().await.rows.remove(&id);
        Ok(())
    }
}
