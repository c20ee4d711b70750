use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set, Unchanged},
    ConnectionTrait, DbBackend, QueryOrder, Statement,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A user that may not be persisted yet, e.g. one just bound from a form.
///
/// `id` is `None` until the store assigns one. The default value is the empty
/// template handed to the creation form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl Draft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), email: email.into() }
    }

    /// Pin the draft to `id`, replacing whatever id it carried.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<Model> for Draft {
    fn from(m: Model) -> Self {
        Self { id: Some(m.id), name: m.name, email: m.email }
    }
}

/// Every user, ordered by id.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    let users = Entity::find().order_by_asc(Column::Id).all(db).await?;
    Ok(users)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(id).one(db).await?;
    Ok(found)
}

/// Upsert keyed by `draft.id`.
///
/// - no id: insert, the database generates the id
/// - id of an existing row: overwrite its fields
/// - id with no row behind it: insert a row carrying exactly that id
///
/// Call it on a transaction when the existence check and the write must be
/// atomic.
pub async fn save<C: ConnectionTrait>(db: &C, draft: Draft) -> Result<Model, ModelError> {
    let Draft { id, name, email } = draft;
    let Some(id) = id else {
        let am = ActiveModel { id: NotSet, name: Set(name), email: Set(email) };
        return Ok(am.insert(db).await?);
    };

    if Entity::find_by_id(id).one(db).await?.is_some() {
        let am = ActiveModel { id: Unchanged(id), name: Set(name), email: Set(email) };
        return Ok(am.update(db).await?);
    }

    debug!(user_id = id, "inserting user with explicit id");
    let am = ActiveModel { id: Set(id), name: Set(name), email: Set(email) };
    let inserted = am.insert(db).await?;
    advance_id_sequence(db, inserted.id).await?;
    Ok(inserted)
}

/// Returns whether a row was removed; a missing id is not an error.
pub async fn delete_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

// Postgres does not advance a serial sequence for explicitly supplied ids, so
// the next generated id could collide with the row just written.
// 只前进不后退：序列若已越过 `id`（包括已删除的行、其他事务未提交的插入），
// 保持 last_value 不变，已分配过的 id 不会被再次发放。
const ADVANCE_ID_SEQUENCE: &str =
    "SELECT setval('users_id_seq', GREATEST($1, (SELECT last_value FROM users_id_seq)))";

async fn advance_id_sequence<C: ConnectionTrait>(db: &C, id: i64) -> Result<(), DbErr> {
    if db.get_database_backend() == DbBackend::Postgres {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, ADVANCE_ID_SEQUENCE, [id.into()]);
        db.execute(stmt).await?;
    }
    Ok(())
}
