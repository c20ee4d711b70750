use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use minijinja::context;
use tracing::info;

use models::user;

use crate::errors::WebError;
use crate::state::ServerState;
use crate::views::{UPDATE_USER_VIEW, USERS_VIEW};

pub const USERS_PATH: &str = "/users";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_users).post(add_user))
        .route("/edit/:id", get(show_update_form))
        .route("/update/:id", post(update_user))
        // 删除沿用 GET 链接，列表页直接点击即可
        .route("/delete/:id", get(delete_user))
}

/// User fields decoded from an urlencoded form body.
///
/// Decoding is explicit: known keys are read one by one, missing keys become
/// empty strings and anything else (including an `id`) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
}

impl UserForm {
    pub fn decode(fields: &HashMap<String, String>) -> Self {
        let field = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self { name: field("name"), email: field("email") }
    }

    pub fn into_draft(self) -> user::Draft {
        user::Draft::new(self.name, self.email)
    }
}

// 302 back to the list page
fn redirect_to_list() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, USERS_PATH)]).into_response()
}

pub async fn list_users(State(state): State<ServerState>) -> Result<Html<String>, WebError> {
    let users = state.users.get_all_users().await?;
    info!(count = users.len(), "list users");
    state.views.render(USERS_VIEW, context! { users => users, user => user::Draft::default() })
}

pub async fn add_user(
    State(state): State<ServerState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    // 新建时忽略表单中的 id，由数据库分配
    let draft = UserForm::decode(&fields).into_draft();
    let saved = state.users.save_user(draft).await?;
    info!(user_id = saved.id, "created user");
    Ok(redirect_to_list())
}

pub async fn show_update_form(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, WebError> {
    let found = state
        .users
        .get_user_by_id(id)
        .await?
        // 只有编辑页把"查无此人"视为错误 (400)
        .ok_or_else(|| WebError::invalid_user_id(id))?;
    state.views.render(UPDATE_USER_VIEW, context! { user => found })
}

pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    // the path id wins over anything the body carried
    let draft = UserForm::decode(&fields).into_draft().with_id(id);
    state.users.save_user(draft).await?;
    info!(user_id = id, "updated user");
    Ok(redirect_to_list())
}

pub async fn delete_user(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    // id 不存在同样重定向，删除是幂等的
    state.users.delete_user(id).await?;
    info!(user_id = id, "deleted user");
    Ok(redirect_to_list())
}
