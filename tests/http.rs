use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Activity {
    id: String,
    #[serde(rename = "type")]
    activity_type: String,
    duration: u32,
    distance: Option<f64>,
    date: String,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Stats {
    count: usize,
    total_duration: u64,
    total_distance: f64,
}

#[derive(Debug, Deserialize)]
struct Insight {
    insight: String,
    loading: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "fit_track_http_{tag}_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/stats")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_path: &Path) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_fit_track"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server(&unique_data_path("shared")).await;
    #[cfg(unix)]
    cleanup::register(server.child.id());
    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn post_activity(client: &Client, base_url: &str, body: serde_json::Value) -> Activity {
    let response = client
        .post(format!("{base_url}/api/activities"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn list_activities(client: &Client, base_url: &str) -> Vec<Activity> {
    client
        .get(format!("{base_url}/api/activities"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn get_stats(client: &Client, base_url: &str) -> Stats {
    client
        .get(format!("{base_url}/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_create_activity_updates_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_stats(&client, &server.base_url).await;

    let created = post_activity(
        &client,
        &server.base_url,
        serde_json::json!({
            "type": "Run",
            "duration": "30",
            "distance": "5",
            "date": "2024-03-10"
        }),
    )
    .await;
    assert_eq!(created.activity_type, "Run");
    assert_eq!(created.duration, 30);
    assert_eq!(created.distance, Some(5.0));
    assert_eq!(created.date, "2024-03-10");
    assert_eq!(created.notes.as_deref(), Some(""));
    assert!(!created.id.is_empty());

    let after = get_stats(&client, &server.base_url).await;
    assert_eq!(after.count, before.count + 1);
    assert_eq!(after.total_duration, before.total_duration + 30);
    assert!((after.total_distance - before.total_distance - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn http_missing_duration_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_stats(&client, &server.base_url).await;
    let response = client
        .post(format!("{}/api/activities", server.base_url))
        .json(&serde_json::json!({ "type": "Walk", "duration": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = get_stats(&client, &server.base_url).await;
    assert_eq!(after.count, before.count);
}

#[tokio::test]
async fn http_delete_removes_only_that_activity() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let keep = post_activity(
        &client,
        &server.base_url,
        serde_json::json!({ "type": "Gym", "duration": "45", "date": "2024-03-11" }),
    )
    .await;
    let remove = post_activity(
        &client,
        &server.base_url,
        serde_json::json!({ "type": "Walk", "duration": "20", "date": "2024-03-11" }),
    )
    .await;

    let before = list_activities(&client, &server.base_url).await;
    let response = client
        .delete(format!("{}/api/activities/{}", server.base_url, remove.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let after = list_activities(&client, &server.base_url).await;
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|activity| activity.id != remove.id));
    assert!(after.iter().any(|activity| activity.id == keep.id));

    let response = client
        .delete(format!("{}/api/activities/{}", server.base_url, remove.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_activities_survive_restart() {
    let data_path = unique_data_path("restart");
    let client = Client::new();

    let server = spawn_server(&data_path).await;
    let first = post_activity(
        &client,
        &server.base_url,
        serde_json::json!({ "type": "Cycling", "duration": "90", "distance": "32.5", "date": "2024-03-09" }),
    )
    .await;
    drop(server);

    let server = spawn_server(&data_path).await;
    let second = post_activity(
        &client,
        &server.base_url,
        serde_json::json!({ "type": "Run", "duration": "30", "date": "2024-03-10" }),
    )
    .await;

    let activities = list_activities(&client, &server.base_url).await;
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].id, first.id);
    assert_eq!(activities[0].distance, Some(32.5));
    assert_ne!(second.id, first.id);
    drop(server);
    let _ = std::fs::remove_file(&data_path);
}

#[tokio::test]
async fn http_invalid_stored_activities_start_empty() {
    let data_path = unique_data_path("corrupt");
    std::fs::write(
        &data_path,
        r#"{"fit_track_activities":"[{broken","fit_track_last_insight":"Bom ritmo!"}"#,
    )
    .unwrap();

    let server = spawn_server(&data_path).await;
    let client = Client::new();

    assert!(list_activities(&client, &server.base_url).await.is_empty());

    let page = client.get(&server.base_url).send().await.unwrap();
    assert!(page.status().is_success());
    let html = page.text().await.unwrap();
    assert!(html.contains("Bom ritmo!"));

    drop(server);
    let _ = std::fs::remove_file(&data_path);
}

#[tokio::test]
async fn http_insight_without_api_key_falls_back() {
    let data_path = unique_data_path("insight");
    let server = spawn_server(&data_path).await;
    let client = Client::new();

    let insight: Insight = client
        .post(format!("{}/api/insight", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        insight.insight,
        "Comece a registrar suas atividades para receber insights personalizados!"
    );
    assert!(!insight.loading);

    post_activity(
        &client,
        &server.base_url,
        serde_json::json!({ "type": "Walk", "duration": "25", "date": "2024-03-12" }),
    )
    .await;
    let insight: Insight = client
        .post(format!("{}/api/insight", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(insight.insight, "Mantenha o foco nos seus objetivos de saúde!");

    let stored: Insight = client
        .get(format!("{}/api/insight", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored.insight, insight.insight);

    drop(server);
    let _ = std::fs::remove_file(&data_path);
}
