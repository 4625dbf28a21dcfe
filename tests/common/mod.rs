// Shared test harness: fake Relworx and Supabase upstreams plus a fully
// wired application router pointed at them.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

use wifi_pay_api::app::build_router;
use wifi_pay_api::config::AppConfig;
use wifi_pay_api::models::package::VoucherPackage;
use wifi_pay_api::state::AppState;

pub const API_KEY: &str = "test-api-key";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";

// ---------------------------------------------------------------------------
// Fake Relworx

#[derive(Clone)]
pub struct FakeRelworx {
    pub payment_response: Arc<Mutex<Value>>,
    pub status_response: Arc<Mutex<Value>>,
    pub fail_payments: Arc<Mutex<bool>>,
    pub fail_status: Arc<Mutex<bool>>,
    pub payment_requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeRelworx {
    fn new() -> Self {
        FakeRelworx {
            payment_response: Arc::new(Mutex::new(json!({
                "success": true,
                "message": "Request accepted",
                "status": "pending",
                "internal_reference": "REL-TEST-1",
            }))),
            status_response: Arc::new(Mutex::new(json!({
                "success": true,
                "status": "pending",
                "message": "Awaiting confirmation",
                "internal_reference": "REL-TEST-1",
            }))),
            fail_payments: Arc::new(Mutex::new(false)),
            fail_status: Arc::new(Mutex::new(false)),
            payment_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_status_response(&self, value: Value) {
        *self.status_response.lock().unwrap() = value;
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/mobile-money/request-payment", post(relworx_request_payment))
            .route("/mobile-money/check-request-status", get(relworx_check_status))
            .with_state(self.clone())
    }
}

async fn relworx_request_payment(
    State(fake): State<FakeRelworx>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if *fake.fail_payments.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "message": "Insufficient merchant balance",
            })),
        );
    }

    fake.payment_requests.lock().unwrap().push(body);
    let response = fake.payment_response.lock().unwrap().clone();
    (StatusCode::OK, Json(response))
}

async fn relworx_check_status(State(fake): State<FakeRelworx>) -> impl IntoResponse {
    if *fake.fail_status.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "message": "Upstream unavailable",
            })),
        );
    }

    let response = fake.status_response.lock().unwrap().clone();
    (StatusCode::OK, Json(response))
}

// ---------------------------------------------------------------------------
// Fake Supabase (PostgREST subset: insert, patch and select on one table)

#[derive(Clone)]
pub struct FakeSupabase {
    pub rows: Arc<Mutex<Vec<Value>>>,
    pub fail_writes: Arc<Mutex<bool>>,
}

impl FakeSupabase {
    fn new() -> Self {
        FakeSupabase {
            rows: Arc::new(Mutex::new(Vec::new())),
            fail_writes: Arc::new(Mutex::new(false)),
        }
    }

    pub fn seed(&self, row: Value) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn row(&self, reference: &str) -> Option<Value> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row["reference"].as_str() == Some(reference))
            .cloned()
    }

    fn router(&self) -> Router {
        Router::new()
            .route(
                "/rest/v1/wifi_transactions",
                post(supabase_insert)
                    .patch(supabase_update)
                    .get(supabase_select),
            )
            .with_state(self.clone())
    }
}

async fn supabase_insert(
    State(fake): State<FakeSupabase>,
    Json(mut row): Json<Value>,
) -> impl IntoResponse {
    if *fake.fail_writes.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "insert failed" })),
        );
    }

    row["id"] = json!(uuid::Uuid::new_v4());
    row["created_at"] = json!(chrono::Utc::now());
    fake.rows.lock().unwrap().push(row.clone());

    (StatusCode::CREATED, Json(json!([row])))
}

async fn supabase_update(
    State(fake): State<FakeSupabase>,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> impl IntoResponse {
    if *fake.fail_writes.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "update failed" })),
        );
    }

    let reference = eq_param(&params, "reference");
    let mut rows = fake.rows.lock().unwrap();
    let mut updated = Vec::new();

    for row in rows.iter_mut() {
        if reference.as_deref() == row["reference"].as_str() {
            if let (Value::Object(target), Value::Object(source)) = (&mut *row, &patch) {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
    }

    (StatusCode::OK, Json(Value::Array(updated)))
}

async fn supabase_select(
    State(fake): State<FakeSupabase>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let rows = fake.rows.lock().unwrap();

    let mut matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            let by_reference = eq_param(&params, "reference")
                .map_or(true, |r| row["reference"].as_str() == Some(r.as_str()));
            let by_device = eq_param(&params, "device_id")
                .map_or(true, |d| row["device_id"].as_str() == Some(d.as_str()));
            by_reference && by_device
        })
        .cloned()
        .collect();

    // Rows are kept in insertion order; "created_at.desc" is just a reverse.
    if params.get("order").map(String::as_str) == Some("created_at.desc") {
        matched.reverse();
    }
    if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        matched.truncate(limit);
    }

    Json(Value::Array(matched))
}

fn eq_param(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|value| value.strip_prefix("eq."))
        .map(|value| value.to_string())
}

// ---------------------------------------------------------------------------
// Environment assembly

pub struct TestEnv {
    pub app: Router,
    pub relworx: FakeRelworx,
    pub supabase: FakeSupabase,
}

pub async fn test_env() -> TestEnv {
    build_env(Some(API_KEY.to_string())).await
}

/// Environment with no server-side API key configured at all.
pub async fn test_env_without_api_key() -> TestEnv {
    build_env(None).await
}

async fn build_env(backend_api_key: Option<String>) -> TestEnv {
    let relworx = FakeRelworx::new();
    let supabase = FakeSupabase::new();

    let relworx_addr = spawn(relworx.router()).await;
    let supabase_addr = spawn(supabase.router()).await;

    let config = Arc::new(AppConfig {
        relworx_api_key: "relworx-test-key".to_string(),
        relworx_account_no: "REL-ACC-01".to_string(),
        relworx_base_url: format!("http://{}", relworx_addr),
        supabase_url: format!("http://{}", supabase_addr),
        supabase_key: "supabase-test-key".to_string(),
        backend_api_key,
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        allowed_origins: vec!["*".to_string()],
        packages: VoucherPackage::default_catalog(),
        port: 0,
        host: "127.0.0.1".to_string(),
    });

    TestEnv {
        app: build_router(AppState::new(config)),
        relworx,
        supabase,
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// ---------------------------------------------------------------------------
// Request helpers

pub fn api_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    request_with_headers(method, uri, body, &[("x-api-key", API_KEY)])
}

pub fn request_with_headers(
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }

    builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn sign_webhook(body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// A fully shaped stored row, as PostgREST would return it.
pub fn seed_transaction(reference: &str, device_id: Option<&str>, status: &str) -> Value {
    json!({
        "id": uuid::Uuid::new_v4(),
        "reference": reference,
        "device_id": device_id,
        "phone": "0752225375",
        "formatted_phone": "+256752225375",
        "amount": 1000.0,
        "currency": "UGX",
        "description": "WiFi Internet Package",
        "status": status,
        "relworx_status": status,
        "relworx_message": "seeded",
        "relworx_reference": "REL-SEED",
        "relworx_response": { "status": status, "message": "seeded" },
        "created_at": chrono::Utc::now(),
        "updated_at": null,
        "confirmed_at": null,
        "failed_at": null,
    })
}
