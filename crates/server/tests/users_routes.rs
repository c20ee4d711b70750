use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use models::user::Draft;
use server::{routes, state::ServerState, views::Views};
use service::users::{InMemoryUserService, UserService};

async fn app_with(users: Vec<Draft>) -> anyhow::Result<(Router, Arc<InMemoryUserService>)> {
    let svc = Arc::new(InMemoryUserService::with_users(users).await?);
    let state = ServerState::new(svc.clone(), Arc::new(Views::new()?));
    Ok((routes::build_router(state), svc))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_string(res: axum::response::Response) -> anyhow::Result<String> {
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn assert_redirects_to_list(res: &axum::response::Response) {
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/users");
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let (app, _) = app_with(vec![]).await?;
    let res = app.oneshot(get("/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(res).await?)?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn list_renders_every_user_and_the_creation_form() -> anyhow::Result<()> {
    let (app, _) = app_with(vec![
        Draft::new("Alice", "alice@example.com"),
        Draft::new("Bob", "bob@example.com"),
    ])
    .await?;

    let res = app.oneshot(get("/users")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_string(res).await?;
    assert!(html.contains("Alice"));
    assert!(html.contains("bob@example.com"));
    assert!(html.contains(r#"action="/users""#));
    Ok(())
}

#[tokio::test]
async fn create_saves_and_redirects() -> anyhow::Result<()> {
    let (app, svc) = app_with(vec![]).await?;

    let res = app.oneshot(post_form("/users", "name=Alice&email=alice%40example.com")).await?;
    assert_redirects_to_list(&res);

    let all = svc.get_all_users().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 1);
    assert_eq!(all[0].name, "Alice");
    assert_eq!(all[0].email, "alice@example.com");
    Ok(())
}

#[tokio::test]
async fn create_ignores_id_in_body() -> anyhow::Result<()> {
    let (app, svc) = app_with(vec![Draft::new("Alice", "alice@example.com")]).await?;

    let res = app.oneshot(post_form("/users", "id=1&name=Bob")).await?;
    assert_redirects_to_list(&res);

    assert_eq!(svc.get_user_by_id(1).await?.unwrap().name, "Alice");
    let bob = svc.get_user_by_id(2).await?.unwrap();
    assert_eq!(bob.name, "Bob");
    assert_eq!(bob.email, "");
    Ok(())
}

#[tokio::test]
async fn edit_form_shows_existing_user() -> anyhow::Result<()> {
    let (app, _) = app_with(vec![Draft::new("Alice", "alice@example.com")]).await?;

    let res = app.oneshot(get("/users/edit/1")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_string(res).await?;
    assert!(html.contains(r#"action="/users/update/1""#));
    assert!(html.contains(r#"value="Alice""#));
    Ok(())
}

#[tokio::test]
async fn edit_form_for_unknown_id_is_invalid_argument() -> anyhow::Result<()> {
    let (app, _) = app_with(vec![]).await?;

    let res = app.oneshot(get("/users/edit/999")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body_string(res).await?)?;
    assert_eq!(body["error"], "Invalid user Id:999");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_rejected() -> anyhow::Result<()> {
    let (app, _) = app_with(vec![]).await?;

    let res = app.oneshot(get("/users/edit/abc")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_uses_path_id_over_body_id() -> anyhow::Result<()> {
    let (app, svc) = app_with(vec![Draft::new("Alice", "alice@example.com")]).await?;

    let res = app.oneshot(post_form("/users/update/2", "id=1&name=Bob")).await?;
    assert_redirects_to_list(&res);

    let alice = svc.get_user_by_id(1).await?.unwrap();
    assert_eq!(alice.name, "Alice");
    let bob = svc.get_user_by_id(2).await?.unwrap();
    assert_eq!(bob.id, 2);
    assert_eq!(bob.name, "Bob");
    Ok(())
}

#[tokio::test]
async fn update_overwrites_existing_fields() -> anyhow::Result<()> {
    let (app, svc) = app_with(vec![Draft::new("Alice", "alice@example.com")]).await?;

    let res = app.oneshot(post_form("/users/update/1", "name=Alicia&email=alicia%40example.com")).await?;
    assert_redirects_to_list(&res);

    let all = svc.get_all_users().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Alicia");
    assert_eq!(all[0].email, "alicia@example.com");
    Ok(())
}

#[tokio::test]
async fn delete_removes_user_and_redirects() -> anyhow::Result<()> {
    let (app, svc) = app_with(vec![Draft::new("Alice", "alice@example.com")]).await?;

    let res = app.oneshot(get("/users/delete/1")).await?;
    assert_redirects_to_list(&res);
    assert!(svc.get_user_by_id(1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn delete_unknown_id_still_redirects() -> anyhow::Result<()> {
    let (app, svc) = app_with(vec![Draft::new("Alice", "alice@example.com")]).await?;

    let res = app.oneshot(get("/users/delete/5")).await?;
    assert_redirects_to_list(&res);
    assert_eq!(svc.get_all_users().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn database_failure_returns_generic_500() -> anyhow::Result<()> {
    // 未执行迁移：users 表不存在，查询必然失败
    let db = models::db::connect_sqlite_memory().await?;
    let svc = Arc::new(service::users::SeaOrmUserService::new(db));
    let app = routes::build_router(ServerState::new(svc, Arc::new(Views::new()?)));

    let res = app.oneshot(get("/users")).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_string(res).await?;
    let body: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(body["error"], "internal error");
    assert!(!text.contains("no such table"), "{text}");
    Ok(())
}
