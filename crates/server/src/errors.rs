use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of a single web request.
#[derive(Debug, Error)]
pub enum WebError {
    /// The request named something that does not exist, e.g. an unknown user id.
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("render error: {0}")]
    Render(#[from] minijinja::Error),
}

impl WebError {
    pub fn invalid_user_id(id: i64) -> Self {
        Self::InvalidArgument(format!("Invalid user Id:{id}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            WebError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            WebError::Service(_) | WebError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    pub fn public_message(&self) -> String {
        match self {
            WebError::InvalidArgument(msg) => msg.clone(),
            // 数据库、模板错误只写日志，响应体不暴露 SQL、表名、连接信息
            WebError::Service(_) | WebError::Render(_) => INTERNAL_ERROR.to_string(),
        }
    }
}

const INTERNAL_ERROR: &str = "internal error";

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, detail = ?self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({"error": self.public_message()}))).into_response()
    }
}
