use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use ripdash_client::{Backend, BackendConfig, ClientError, HttpBackend};
use ripdash_core::{JobStatus, Tier};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Recorded {
    ejected: Arc<Mutex<Vec<String>>>,
    cancelled: Arc<Mutex<Vec<String>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

fn record_auth(state: &Recorded, headers: &HeaderMap) {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth.lock().unwrap().push(value);
}

async fn drives(State(state): State<Recorded>, headers: HeaderMap) -> Json<Value> {
    record_auth(&state, &headers);
    Json(json!([
        {
            "path": "/dev/sr0",
            "model": "ASUS BW-16D1HT",
            "capability": ["CD", "DVD", "BLURAY"],
            "job_id": "job-1",
            "disc_label": "HEAT",
            "blacklisted": false
        },
        {
            "path": "/dev/sr1",
            "model": "Unknown",
            "capability": ["Unknown"],
            "job_id": null,
            "disc_label": null,
            "blacklisted": true
        }
    ]))
}

async fn jobs() -> Json<Value> {
    Json(json!([
        {
            "job_id": "job-1",
            "disc_type": "BLURAY",
            "drive": "/dev/sr0",
            "disc_label": "HEAT",
            "temp_path": "/tmp/heat",
            "output_path": "/media/heat",
            "status": "Running",
            "progress": 37,
            "step": 1,
            "steps_total": 2,
            "step_description": "Ripping",
            "stdout_log": []
        }
    ]))
}

async fn system_info() -> Json<Value> {
    Json(json!({
        "os_info": {
            "os": "Linux",
            "os_version": "6.8",
            "kernel": "6.8.0",
            "uptime": "1d 2h 3m 4s"
        },
        "memory_info": { "total": 17179869184u64, "used": 8589934592u64, "percent": 50.0 },
        "cpu_info": {
            "model": "Ryzen 5",
            "cores": 6,
            "threads": 12,
            "frequency": 3600,
            "usage": 7.5,
            "temperature": 41
        },
        "hwenc_info": { "vendors": { "nvenc": { "available": true, "codecs": ["h264", "hevc"] } } },
        "gpu_info": []
    }))
}

async fn eject(
    State(state): State<Recorded>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let path = body["path"].as_str().unwrap_or_default().to_string();
    if path == "/dev/missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Drive not found" })),
        );
    }
    state.ejected.lock().unwrap().push(path);
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn cancel(State(state): State<Recorded>, Path(id): Path<String>) -> StatusCode {
    state.cancelled.lock().unwrap().push(id);
    StatusCode::OK
}

async fn spawn_backend() -> (String, Recorded) {
    let state = Recorded::default();
    let app = Router::new()
        .route("/api/drives", get(drives))
        .route("/api/jobs", get(jobs))
        .route("/api/system-info", get(system_info))
        .route("/api/drives/eject", post(eject))
        .route("/api/jobs/{id}/cancel", post(cancel))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client(base_url: String) -> HttpBackend {
    HttpBackend::new(BackendConfig {
        base_url,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn fetches_and_decodes_snapshots() {
    let (url, _) = spawn_backend().await;
    let backend = client(url);

    let drives = backend.drives().await.unwrap();
    assert_eq!(drives.len(), 2);
    assert_eq!(drives[0].job_id.as_deref(), Some("job-1"));
    assert!(drives[0].has_native(Tier::Bluray));
    assert!(drives[1].blacklisted);

    let jobs = backend.jobs().await.unwrap();
    assert_eq!(jobs[0].status, JobStatus::Running);
    assert_eq!(jobs[0].steps_total, Some(2));

    let info = backend.system_info().await.unwrap();
    assert_eq!(info.cpu_info.threads, Some(12));
    assert!(info.hwenc_info.vendors["nvenc"].available);
    assert!(info.gpu_info.is_empty());
}

#[tokio::test]
async fn eject_posts_path_and_surfaces_backend_detail() {
    let (url, state) = spawn_backend().await;
    let backend = client(url);

    backend.eject("/dev/sr0").await.unwrap();
    assert_eq!(*state.ejected.lock().unwrap(), vec!["/dev/sr0".to_string()]);

    let err = backend.eject("/dev/missing").await.unwrap_err();
    match err {
        ClientError::Status { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail.as_deref(), Some("Drive not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn cancel_posts_to_job_route() {
    let (url, state) = spawn_backend().await;
    let backend = client(url);

    backend.cancel_job("job-1").await.unwrap();
    assert_eq!(*state.cancelled.lock().unwrap(), vec!["job-1".to_string()]);
}

#[tokio::test]
async fn sends_basic_auth_when_configured() {
    let (url, state) = spawn_backend().await;
    let backend = HttpBackend::new(BackendConfig {
        base_url: url,
        username: Some("admin".into()),
        password: Some("secret".into()),
    })
    .unwrap();

    backend.drives().await.unwrap();
    let auth = state.auth.lock().unwrap().clone();
    // base64("admin:secret")
    assert_eq!(auth, vec![Some("Basic YWRtaW46c2VjcmV0".to_string())]);
}

#[tokio::test]
async fn missing_route_is_a_status_error_and_dead_host_is_network() {
    let (url, _) = spawn_backend().await;
    let backend = client(format!("{url}/nested"));
    let err = backend.jobs().await.unwrap_err();
    assert_eq!(err.code(), "status");

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let err = client(dead).drives().await.unwrap_err();
    assert_eq!(err.code(), "network");
}
