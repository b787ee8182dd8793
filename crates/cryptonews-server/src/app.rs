//! Router construction and the listener loop.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::require_api_key;
use crate::routes::{feedback, health, parse};
use crate::state::AppState;

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Create the router. `/parse` and `/feedback` sit behind the API-key check.
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/parse", post(parse::parse))
        .route("/feedback", post(feedback::feedback))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(health::health))
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".into(),
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, create_app(state)).await
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use cryptonews_engine::{Classifier, ClassifierConfig};
    use cryptonews_store::DuckStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::routes::parse::PARSE_ID_HEADER;

    fn classifier() -> Classifier {
        Classifier::new(ClassifierConfig::default())
    }

    fn persistent_state() -> AppState {
        AppState::new(classifier()).with_store(Box::new(DuckStore::open().unwrap()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn error_code(body: &Value) -> &str {
        body["error"]["code"].as_str().unwrap()
    }

    #[tokio::test]
    async fn health_reports_versions() {
        let app = create_app(AppState::new(classifier()));
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["schema_version"], "v1");
        assert_eq!(body["persistence"], false);
    }

    #[tokio::test]
    async fn parse_returns_record() {
        let app = create_app(AppState::new(classifier()));
        let resp = app
            .oneshot(post_json(
                "/parse",
                json!({"text": "The U.S. SEC clarified rules for tokenized stocks."}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(PARSE_ID_HEADER).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["event_type"], "REGULATORY_GUIDANCE");
        assert_eq!(body["jurisdiction"], "US");
        assert_eq!(body["schema_version"], "v1");
        assert!(body["market_direction"].is_null());
    }

    #[tokio::test]
    async fn parse_persists_and_sets_header() {
        let app = create_app(persistent_state());
        let resp = app
            .oneshot(post_json(
                "/parse",
                json!({"text": "Bitcoin fell", "input_id": "art-9", "source_name": "wire"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let id = resp.headers().get(PARSE_ID_HEADER).unwrap().to_str().unwrap();
        assert!(id.parse::<i64>().unwrap() >= 1);
    }

    #[tokio::test]
    async fn parse_rejections_map_to_envelope() {
        let app = create_app(AppState::new(classifier()));

        let resp = app
            .clone()
            .oneshot(Request::post("/parse").body(Body::from("{}")).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error_code(&body_json(resp).await), "UNSUPPORTED_MEDIA_TYPE");

        let resp = app
            .clone()
            .oneshot(
                Request::post("/parse")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body_json(resp).await), "INVALID_JSON");

        let resp = app
            .clone()
            .oneshot(post_json("/parse", json!({"deterministic": true})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body_json(resp).await), "INVALID_REQUEST");

        let resp = app
            .clone()
            .oneshot(post_json("/parse", json!({"text": "   "})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = app
            .oneshot(post_json("/parse", json!({"text": "x".repeat(20_001)})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(resp).await;
        assert_eq!(error_code(&body), "PAYLOAD_TOO_LARGE");
        assert!(body["error"]["details"].is_null());
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let app = create_app(AppState::new(classifier()));
        let resp = app
            .oneshot(post_json("/parse", json!({"text": "x".repeat(MAX_BODY_BYTES)})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn api_key_enforced_on_parse_not_health() {
        let state = AppState::new(classifier()).with_api_key(Some("s3cret".into()));
        let app = create_app(state);

        let resp = app
            .clone()
            .oneshot(post_json("/parse", json!({"text": "Bitcoin fell"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let mut req = post_json("/parse", json!({"text": "Bitcoin fell"}));
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body_json(resp).await), "FORBIDDEN");

        let mut req = post_json("/parse", json!({"text": "Bitcoin fell"}));
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer s3cret".parse().unwrap());
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn feedback_requires_persistence() {
        let app = create_app(AppState::new(classifier()));
        let resp = app
            .oneshot(post_json(
                "/feedback",
                json!({"parse_id": 1, "expected": {"event_type": "UNKNOWN"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body_json(resp).await), "PERSISTENCE_DISABLED");
    }

    #[tokio::test]
    async fn feedback_round_trip_through_parse_id() {
        let app = create_app(persistent_state());
        let resp = app
            .clone()
            .oneshot(post_json("/parse", json!({"text": "Exchange drained overnight"})))
            .await
            .unwrap();
        let parse_id: i64 = resp
            .headers()
            .get(PARSE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/feedback",
                json!({
                    "parse_id": parse_id,
                    "expected": {"event_type": "SECURITY_INCIDENT"},
                    "notes": "hack"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "stored");
        assert!(body["feedback_id"].as_i64().unwrap() >= 1);

        let resp = app
            .clone()
            .oneshot(post_json(
                "/feedback",
                json!({"parse_id": parse_id + 100, "expected": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body_json(resp).await), "PARSE_NOT_FOUND");

        let resp = app
            .oneshot(post_json("/feedback", json!({"expected": {}})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
