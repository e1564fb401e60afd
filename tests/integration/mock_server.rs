//! Scripted accounts API used by the gateway tests.
//!
//! Each fixture id selects one canned behaviour; every other path answers
//! 404 with `{"error_message": "not found"}`.

use accounts_client::{AccountAttributes, AccountClassification, AccountData};
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub const ACCOUNTS_ROUTE: &str = "/v1/organisation/accounts";

/// What the server saw for one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

pub struct Fixture {
    pub account: AccountData,
    pub id_to_get: Uuid,
    pub id_to_delete: Uuid,
    pub id_to_fail: Uuid,
    pub id_without_body: Uuid,
    pub id_slow: Uuid,
    pub id_garbled: Uuid,
    pub id_empty_data: Uuid,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Fixture {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            account: sample_account(),
            id_to_get: Uuid::new_v4(),
            id_to_delete: Uuid::new_v4(),
            id_to_fail: Uuid::new_v4(),
            id_without_body: Uuid::new_v4(),
            id_slow: Uuid::new_v4(),
            id_garbled: Uuid::new_v4(),
            id_empty_data: Uuid::new_v4(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &str,
        path: String,
        query: Option<String>,
        headers: &HeaderMap,
        body: Value,
    ) {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path,
            query,
            content_type,
            body,
        });
    }
}

pub fn sample_account() -> AccountData {
    AccountData::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Some(AccountAttributes {
            account_classification: Some(AccountClassification::Personal),
            bank_id: Some("123456".to_string()),
            bank_id_code: Some("GBDSC".to_string()),
            base_currency: Some("GBP".to_string()),
            bic: Some("EXMPLGB2XXX".to_string()),
            country: Some("GB".to_string()),
            name: Some(vec!["Samantha".to_string(), "Holder".to_string()]),
            ..Default::default()
        }),
    )
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error_message": message }))).into_response()
}

fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}

async fn create_account(
    State(fixture): State<Arc<Fixture>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let value: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    fixture.record("POST", ACCOUNTS_ROUTE.to_string(), None, &headers, value.clone());

    if value["data"]["id"] == json!(fixture.id_to_fail.to_string()) {
        return error_response(StatusCode::BAD_REQUEST, "some invalid field");
    }
    (StatusCode::CREATED, Json(value)).into_response()
}

async fn fetch_account(
    State(fixture): State<Arc<Fixture>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    fixture.record("GET", format!("{}/{}", ACCOUNTS_ROUTE, id), None, &headers, Value::Null);

    if id == fixture.id_to_get {
        (StatusCode::OK, Json(json!({ "data": &fixture.account }))).into_response()
    } else if id == fixture.id_slow {
        tokio::time::sleep(Duration::from_secs(30)).await;
        (StatusCode::OK, Json(json!({ "data": &fixture.account }))).into_response()
    } else if id == fixture.id_empty_data {
        (StatusCode::OK, Json(json!({ "data": [] }))).into_response()
    } else if id == fixture.id_garbled {
        (StatusCode::OK, "<html>maintenance</html>").into_response()
    } else {
        not_found()
    }
}

async fn delete_account(
    State(fixture): State<Arc<Fixture>>,
    Path(id): Path<Uuid>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    fixture.record(
        "DELETE",
        format!("{}/{}", ACCOUNTS_ROUTE, id),
        query.clone(),
        &headers,
        Value::Null,
    );

    if id == fixture.id_to_delete {
        if query.as_deref() == Some("version=0") {
            StatusCode::NO_CONTENT.into_response()
        } else {
            error_response(StatusCode::CONFLICT, "no version")
        }
    } else if id == fixture.id_without_body {
        StatusCode::NOT_FOUND.into_response()
    } else {
        not_found()
    }
}

async fn fallback() -> Response {
    not_found()
}

/// Serve `fixture` on an ephemeral local port and return its base URL.
pub async fn spawn(fixture: Arc<Fixture>) -> String {
    let app = Router::new()
        .route(ACCOUNTS_ROUTE, post(create_account))
        .route(
            &format!("{}/:id", ACCOUNTS_ROUTE),
            get(fetch_account).delete(delete_account),
        )
        .fallback(fallback)
        .with_state(fixture);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
