use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}
