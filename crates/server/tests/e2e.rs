use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use reqwest::{redirect::Policy, StatusCode as HttpStatusCode};
use tokio::net::TcpListener;

use server::{routes, state::ServerState, views::Views};
use service::users::SeaOrmUserService;

struct TestApp {
    base_url: String,
}

/// Real listener on an ephemeral port, backed by a migrated in-memory SQLite database
async fn start_server() -> anyhow::Result<TestApp> {
    let db = models::db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState::new(Arc::new(SeaOrmUserService::new(db)), Arc::new(Views::new()?));
    let app: Router = routes::build_router(state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

// redirects are asserted, not followed
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_user_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Create
    let res = c.post(format!("{}/users", app.base_url))
        .form(&[("name", "Alice"), ("email", "alice@example.com")])
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/users");

    // List
    let res = c.get(format!("{}/users", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let html = res.text().await?;
    assert!(html.contains("Alice"));
    assert!(html.contains("/users/edit/1"));

    // Edit form
    let res = c.get(format!("{}/users/edit/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("alice@example.com"));

    // Update with a conflicting body id: the path id wins
    let res = c.post(format!("{}/users/update/2", app.base_url))
        .form(&[("id", "1"), ("name", "Bob"), ("email", "bob@example.com")])
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::FOUND);
    let res = c.get(format!("{}/users/edit/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("Bob"));
    let res = c.get(format!("{}/users/edit/1", app.base_url)).send().await?;
    assert!(res.text().await?.contains("Alice"));

    // Delete, twice
    for _ in 0..2 {
        let res = c.get(format!("{}/users/delete/1", app.base_url)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::FOUND);
    }
    let res = c.get(format!("{}/users/edit/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
