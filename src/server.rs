//! HTTP contract-checking service.
//!
//! Lets a backend or browser client validate and normalize contract payloads
//! without linking the Rust crate.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/contracts/list` | List all contract kinds |
//! | `POST` | `/contracts/{kind}/check` | Decode, normalize, and check a payload |
//! | `POST` | `/contracts/{kind}/rank` | Rank an array of search hits (`?limit=&normalize=`) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "malformed_contract", "message": "malformed drive.file contract: ..." } }
//! ```
//!
//! Error codes: `not_found` (404), `malformed_contract` (400),
//! `bad_request` (400), `invalid_contract` (422), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ragwire_core::kind::{Checked, KindInfo};
use ragwire_core::{ContractError, ContractKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::check_cmd::check_payload;
use crate::config::Config;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Build the router. Split out from [`run_server`] so it can be driven
/// without binding a socket.
pub fn router(config: &Config) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/contracts/list", get(handle_list))
        .route("/contracts/{kind}/check", post(handle_check))
        .route("/contracts/{kind}/rank", post(handle_rank))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP service on `[server].bind` and runs until the process
/// is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config);

    tracing::info!(
        bind = %bind_addr,
        strict = config.checks.strict,
        "contract service listening"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ContractError> for AppError {
    fn from(err: ContractError) -> Self {
        let (status, code) = match &err {
            ContractError::UnknownKind(_) => (StatusCode::NOT_FOUND, "not_found"),
            ContractError::Malformed { .. } => (StatusCode::BAD_REQUEST, "malformed_contract"),
            ContractError::NotRankable(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ContractError::Encode { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

/// Body rejections: unparseable JSON is a malformed contract, anything else
/// (wrong content type, unreadable body) is a bad request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                "malformed_contract"
            }
            _ => "bad_request",
        };
        AppError {
            status: rejection.status(),
            code,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: rejection.body_text(),
        }
    }
}

fn invalid_contract(checked: &Checked) -> AppError {
    let details: Vec<String> = checked.violations.iter().map(|v| v.to_string()).collect();
    AppError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        code: "invalid_contract",
        message: format!("{}: {}", checked.contract, details.join("; ")),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /contracts/list ============

#[derive(Serialize)]
struct ContractListResponse {
    contracts: Vec<KindInfo>,
}

async fn handle_list() -> Json<ContractListResponse> {
    Json(ContractListResponse {
        contracts: ContractKind::ALL.iter().map(|k| k.info()).collect(),
    })
}

// ============ POST /contracts/{kind}/check ============

#[derive(Deserialize, Default)]
struct CheckQuery {
    #[serde(default)]
    many: bool,
}

/// Returns `404` for an unknown kind, `400` for a malformed payload, and
/// `422` when strict checking is on and the payload has violations.
async fn handle_check(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    query: Result<Query<CheckQuery>, QueryRejection>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind: ContractKind = kind.parse()?;
    let Query(query) = query?;
    let Json(payload) = payload?;
    let checked = check_payload(&state.config, kind, payload, query.many).map_err(|e| {
        match e.downcast::<ContractError>() {
            Ok(ce) => AppError::from(ce),
            Err(other) => AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "internal",
                message: other.to_string(),
            },
        }
    })?;

    if state.config.checks.strict && !checked.is_clean() {
        tracing::warn!(
            contract = checked.contract,
            violations = checked.violations.len(),
            "rejected payload"
        );
        return Err(invalid_contract(&checked));
    }

    Ok(Json(serde_json::json!({ "result": checked })))
}

// ============ POST /contracts/{kind}/rank ============

#[derive(Deserialize, Default)]
struct RankQuery {
    limit: Option<usize>,
    #[serde(default)]
    normalize: bool,
}

async fn handle_rank(
    Path(kind): Path<String>,
    query: Result<Query<RankQuery>, QueryRejection>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind: ContractKind = kind.parse()?;
    let Query(query) = query?;
    let Json(payload) = payload?;
    let ranked = kind.rank_json(payload, query.limit, query.normalize)?;
    Ok(Json(serde_json::json!({ "result": ranked })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn state(toml: &str) -> AppState {
        AppState {
            config: Arc::new(parse_config(toml).unwrap()),
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post(uri: &str, content_type: &str, body: &'static str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        router(&Config::minimal()).oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_check_ok() {
        let Json(body) = handle_check(
            State(state("")),
            Path("drive.connection".to_string()),
            Ok(Query(CheckQuery::default())),
            Ok(Json(json!({"id": "u1", "email": "a@b.com", "connected": true}))),
        )
        .await
        .unwrap();
        assert_eq!(body["result"]["contract"], "drive.connection");
        assert_eq!(body["result"]["violations"], json!([]));
        assert_eq!(body["result"]["normalized"]["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_check_unknown_kind_is_404() {
        let err = handle_check(
            State(state("")),
            Path("drive.folder".to_string()),
            Ok(Query(CheckQuery::default())),
            Ok(Json(json!({}))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "not_found");
    }

    #[tokio::test]
    async fn test_check_malformed_is_400() {
        let err = handle_check(
            State(state("")),
            Path("drive.sync_status".to_string()),
            Ok(Query(CheckQuery::default())),
            Ok(Json(json!({"filesCount": 1, "chunksCount": 1, "status": "archived"}))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"]["code"], "malformed_contract");
    }

    #[tokio::test]
    async fn test_strict_violation_is_422() {
        let err = handle_check(
            State(state("[checks]\nstrict = true\n")),
            Path("drive.sync_status".to_string()),
            Ok(Query(CheckQuery::default())),
            Ok(Json(json!({
                "filesCount": 1, "chunksCount": 1, "status": "indexed",
                "syncedAt": null, "error": "quota exceeded"
            }))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("error:"), "{}", err.message);
    }

    #[tokio::test]
    async fn test_lenient_violation_is_reported() {
        let Json(body) = handle_check(
            State(state("")),
            Path("rag.bundle".to_string()),
            Ok(Query(CheckQuery::default())),
            Ok(Json(json!({"id": "b1", "docs": ["d1", "d1"], "locked": false}))),
        )
        .await
        .unwrap();
        assert_eq!(body["result"]["violations"][0]["field"], "docs[1]");
    }

    #[tokio::test]
    async fn test_rank() {
        let Json(body) = handle_rank(
            Path("rag.search_result".to_string()),
            Ok(Query(RankQuery {
                limit: Some(1),
                normalize: false,
            })),
            Ok(Json(json!([
                {"doc_id": "a", "title": "t", "location": "l", "snippet": "s", "score": 0.2},
                {"doc_id": "b", "title": "t", "location": "l", "snippet": "s", "score": 0.9}
            ]))),
        )
        .await
        .unwrap();
        assert_eq!(body["result"], json!([
            {"doc_id": "b", "title": "t", "location": "l", "snippet": "s", "score": 0.9}
        ]));
    }

    #[tokio::test]
    async fn test_rank_non_search_kind() {
        let err = handle_rank(
            Path("siftops.bundle".to_string()),
            Ok(Query(RankQuery::default())),
            Ok(Json(json!([]))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, "bad_request");
    }

    #[tokio::test]
    async fn test_non_json_body_gets_error_envelope() {
        let resp = post("/contracts/rag.bundle/check", "application/json", "not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "malformed_contract");
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let resp = post("/contracts/rag.bundle/check", "text/plain", "{}").await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_bad_limit_query_gets_error_envelope() {
        let resp = post("/contracts/rag.search_result/rank?limit=x", "application/json", "[]").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_list_and_health() {
        let Json(list) = handle_list().await;
        assert_eq!(list.contracts.len(), ContractKind::ALL.len());

        let Json(health) = handle_health().await;
        assert_eq!(health.status, "ok");
    }
}
