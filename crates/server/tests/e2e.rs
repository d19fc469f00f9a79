use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

use configs::AppConfig;

const REFERER: &str = "https://e2e-app.appspot.com/";

struct TestApp {
    base_url: String,
}

async fn start_server(store_path: Option<String>) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.app.app_id = "e2e-app".into();
    cfg.store.path = store_path;
    cfg.normalize_and_validate()?;

    let store = server::startup::build_store(&cfg.store).await?;
    let app = server::startup::build_app(&cfg, store);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_add_favorite_list() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let c = reqwest::Client::new();
    let url = format!("{}/posts", app.base_url);

    let res = c.post(&url)
        .header("Referer", REFERER)
        .json(&json!({"text": "hi", "username": "bob", "avatar": "a.png"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let added = res.json::<serde_json::Value>().await?;

    let res = c.put(&url)
        .header("Referer", REFERER)
        .json(&json!({"uid": added["uid"], "favorite": true}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.get(&url).header("Referer", REFERER).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let listed = res.json::<serde_json::Value>().await?;
    assert_eq!(
        listed,
        json!({"posts": [{
            "uid": added["uid"],
            "text": "hi",
            "username": "bob",
            "avatar": "a.png",
            "favorite": true
        }]})
    );
    Ok(())
}

#[tokio::test]
async fn e2e_wrong_referer_unauthorized() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = reqwest::Client::new()
        .get(format!("{}/posts", app.base_url))
        .header("Referer", "https://evil.com")
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_file_store_survives_restart() -> anyhow::Result<()> {
    let path = std::env::temp_dir()
        .join(format!("posts_e2e_{}", uuid::Uuid::new_v4()))
        .join("posts.json");
    let path_str = path.to_string_lossy().into_owned();
    let c = reqwest::Client::new();

    let first = start_server(Some(path_str.clone())).await?;
    let res = c.post(format!("{}/posts", first.base_url))
        .header("Referer", REFERER)
        .json(&json!({"text": "kept", "username": "dora", "avatar": "d.png"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let second = start_server(Some(path_str)).await?;
    let listed = c.get(format!("{}/posts", second.base_url))
        .header("Referer", REFERER)
        .send().await?
        .json::<serde_json::Value>().await?;
    assert_eq!(listed["posts"][0]["text"], "kept");

    if let Some(dir) = path.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
    Ok(())
}
