use std::net::SocketAddr;
use std::path::PathBuf;

use configs::{AppConfig, CorruptPolicy};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::startup::build_app;

struct TestApp {
    base_url: String,
    data_file: PathBuf,
}

impl TestApp {
    async fn cleanup(self) {
        if let Some(dir) = self.data_file.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }
}

async fn start_server(on_corrupt: CorruptPolicy, seed: Option<&str>) -> anyhow::Result<TestApp> {
    // Isolated data file per test run
    let data_file = std::env::temp_dir()
        .join(format!("employee_e2e_{}", Uuid::new_v4()))
        .join("db.json");
    if let Some(content) = seed {
        tokio::fs::create_dir_all(data_file.parent().unwrap()).await?;
        tokio::fs::write(&data_file, content).await?;
    }

    let mut cfg = AppConfig::default();
    cfg.storage.data_file = data_file.clone();
    cfg.storage.on_corrupt = on_corrupt;
    cfg.web.static_dir = "/nonexistent-static-dir".into();
    cfg.normalize_and_validate()?;

    let app = build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), data_file })
}

#[tokio::test]
async fn e2e_crud_persists_to_file() -> anyhow::Result<()> {
    let app = start_server(CorruptPolicy::Reset, None).await?;
    let c = reqwest::Client::new();
    let url = format!("{}/api/employees", app.base_url);

    let res = c.post(&url).json(&json!({"name": "Ana", "role": "Dev", "salary": 5000})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created, json!({"id": 1, "name": "Ana", "role": "Dev", "salary": 5000}));

    let res = c.post(&url).json(&json!({"name": "Bruno", "role": "Ops", "salary": "4200.5"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.put(format!("{url}/1")).json(&json!({"salary": 6000})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // The file holds exactly what the API reports
    let on_disk: Value = serde_json::from_str(&tokio::fs::read_to_string(&app.data_file).await?)?;
    let listed: Value = c.get(&url).send().await?.json().await?;
    assert_eq!(on_disk, listed);
    assert_eq!(
        listed,
        json!([
            {"id": 1, "name": "Ana", "role": "Dev", "salary": 6000},
            {"id": 2, "name": "Bruno", "role": "Ops", "salary": 4200.5}
        ])
    );

    let res = c.delete(format!("{url}/2")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["removed"]["name"], "Bruno");

    let res = c.delete(format!("{url}/2")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_seeded_ids_continue_after_max() -> anyhow::Result<()> {
    let seed = r#"[{"id":1,"name":"A","role":"Dev","salary":1},{"id":3,"name":"C","role":"Dev","salary":3}]"#;
    let app = start_server(CorruptPolicy::Reset, Some(seed)).await?;
    let res = reqwest::Client::new()
        .post(format!("{}/api/employees", app.base_url))
        .json(&json!({"name": "D", "role": "Dev", "salary": 4}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["id"], 4);
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_file_self_heals_by_default() -> anyhow::Result<()> {
    let app = start_server(CorruptPolicy::Reset, Some("[{broken")).await?;
    let res = reqwest::get(format!("{}/api/employees", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));
    assert_eq!(tokio::fs::read_to_string(&app.data_file).await?, "[]");
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_file_fails_when_configured() -> anyhow::Result<()> {
    let app = start_server(CorruptPolicy::Fail, Some("[{broken")).await?;
    let res = reqwest::get(format!("{}/api/employees", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert!(body["error"].as_str().unwrap_or_default().starts_with("error reading store"));
    assert_eq!(tokio::fs::read_to_string(&app.data_file).await?, "[{broken");
    app.cleanup().await;
    Ok(())
}
