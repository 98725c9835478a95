use axum::{
    body::{Body, Bytes},
    extract::{Extension, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::ai::{FormatMode, Formatter};
use crate::text_utils::extract_request_text;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatResponse {
    pub formatted_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    pub rate_limit_per_second: Option<u64>,
    pub auth_token: Option<String>,
}

/// Shared handler state. `formatter` is `None` when no model is configured.
#[derive(Clone, Debug)]
pub struct ApiState {
    pub formatter: Option<Formatter>,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

#[derive(Debug)]
struct RateLimiter {
    limit: u64,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

pub fn router(state: ApiState, config: ApiConfig) -> Router {
    let mut format_routes = Router::new()
        .route("/format-product", post(format_product))
        .with_state(state);

    if let Some(rate_limit) = config.rate_limit_per_second {
        let limiter = Arc::new(RateLimiter::new(rate_limit, Duration::from_secs(1)));
        format_routes =
            format_routes.layer(middleware::from_fn_with_state(limiter, rate_limit_requests));
    }

    if let Some(token) = config.auth_token {
        format_routes =
            format_routes.layer(middleware::from_fn_with_state(Arc::new(token), require_auth));
    }

    Router::new()
        .route("/health", get(health))
        .merge(format_routes)
        .layer(middleware::from_fn(assign_request_id))
}

/// Bind `addr` and serve the router until the listener fails.
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn format_product(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    body: Bytes,
) -> Response {
    let parsed = match extract_request_text(&body) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(request_id = %request.request_id, error = %err, "Rejecting malformed body");
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid input: {err}"));
        }
    };
    if parsed.text.is_empty() {
        tracing::debug!(request_id = %request.request_id, "Rejecting empty input");
        return error_response(StatusCode::BAD_REQUEST, "No input provided");
    }

    let mode = match parsed.mode.as_deref() {
        None => FormatMode::Product,
        Some(raw) => match raw.parse::<FormatMode>() {
            Ok(mode) => mode,
            Err(err) => {
                tracing::debug!(request_id = %request.request_id, error = %err, "Rejecting mode");
                return error_response(StatusCode::BAD_REQUEST, &format!("Invalid input: {err}"));
            }
        },
    };

    let Some(formatter) = state.formatter else {
        tracing::warn!(request_id = %request.request_id, "Formatting requested without model configuration");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "formatting_disabled");
    };

    match formatter.format(mode, &parsed.text).await {
        Ok(formatted_text) => {
            tracing::info!(
                request_id = %request.request_id,
                %mode,
                input_chars = parsed.text.chars().count(),
                "Formatted product via API"
            );
            (StatusCode::OK, Json(FormatResponse { formatted_text })).into_response()
        }
        Err(err) => {
            tracing::error!(request_id = %request.request_id, %mode, error = %err, "Model call failed");
            error_response(StatusCode::BAD_GATEWAY, &err.to_string())
        }
    }
}

async fn require_auth(State(expected): State<Arc<String>>, req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.as_str())
        .unwrap_or("unknown");
    match extract_bearer_token(req.headers()) {
        Some(token) if token == *expected => {
            tracing::debug!(request_id, token_preview = %token_preview(&token), "Authenticated API request");
            next.run(req).await
        }
        Some(token) => {
            tracing::debug!(request_id, token_preview = %token_preview(&token), "Bearer token rejected");
            error_response(StatusCode::UNAUTHORIZED, "unauthorized")
        }
        None => {
            tracing::debug!(request_id, "Missing bearer token");
            error_response(StatusCode::UNAUTHORIZED, "unauthorized")
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header; the scheme is
/// matched case-insensitively.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn token_preview(token: &str) -> String {
    token.chars().take(6).collect()
}

/// Caller-supplied request id, accepted only when it is a short plain token.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let valid = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| id.to_string())
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id =
        incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = tracing::debug_span!(
        "api_request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let mut response = next.run(req).instrument(span.clone()).await;
    let Ok(value) = HeaderValue::from_str(&request_id) else {
        return response;
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    span.in_scope(|| tracing::debug!(status = %response.status(), "API request completed"));
    response
}

impl RateLimiter {
    fn new(limit: u64, window: Duration) -> Self {
        Self {
            limit,
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Record a request at `now` unless the window is already full.
    async fn try_acquire(&self, now: Instant) -> bool {
        let mut timestamps = self.timestamps.lock().await;
        while timestamps
            .front()
            .is_some_and(|ts| now.duration_since(*ts) >= self.window)
        {
            timestamps.pop_front();
        }
        if timestamps.len() as u64 >= self.limit {
            return false;
        }
        timestamps.push_back(now);
        true
    }
}

async fn rate_limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if limiter.try_acquire(Instant::now()).await {
        return next.run(req).await;
    }
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.as_str())
        .unwrap_or("unknown");
    tracing::debug!(request_id, limit = limiter.limit, "API rate limit exceeded");
    error_response(StatusCode::TOO_MANY_REQUESTS, "rate_limited")
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::config::AiConfig;
    use crate::config::PromptConfig;
    use axum::body::to_bytes;
    use proptest::prelude::*;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn formatter_for(base_url: String) -> Formatter {
        Formatter::new(
            AiConfig {
                api_key: "k".into(),
                base_url,
                model: "m".into(),
                timeout: Duration::from_secs(5),
            },
            PromptConfig::default(),
        )
        .unwrap()
    }

    async fn mock_model(content: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "choices": [{ "message": { "content": content } }] })),
            )
            .mount(&server)
            .await;
        server
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/format-product")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let payload: HealthResponse = read_json(response).await;
        assert_eq!(payload.status, "ok");
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app.oneshot(post("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = read_json(response).await;
        assert_eq!(payload.error, "No input provided");
    }

    #[tokio::test]
    async fn json_without_text_is_rejected() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app.oneshot(post(r#"{"text":""}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app
            .oneshot(post(r#"{"text":"shirt","mode":"poem"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = read_json(response).await;
        assert!(payload.error.starts_with("Invalid input"));
    }

    #[tokio::test]
    async fn missing_model_config_is_unavailable() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app.oneshot(post(r#"{"text":"shirt"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn json_body_is_formatted() {
        let server = mock_model("  1 pc MIX Shirt Cotton | 600 | Soft | - | M,L,XL,XXL\n").await;
        let app = router(
            ApiState {
                formatter: Some(formatter_for(server.uri())),
            },
            ApiConfig::default(),
        );
        let response = app
            .oneshot(post(r#"{"text":"Cotton shirt 500"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload: FormatResponse = read_json(response).await;
        assert_eq!(
            payload.formatted_text,
            "1 pc MIX Shirt Cotton | 600 | Soft | - | M,L,XL,XXL"
        );
    }

    #[tokio::test]
    async fn raw_text_body_is_formatted() {
        let server = mock_model("ok").await;
        let app = router(
            ApiState {
                formatter: Some(formatter_for(server.uri())),
            },
            ApiConfig::default(),
        );
        let response = app.oneshot(post("Pants\r\nPrice 900")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload: FormatResponse = read_json(response).await;
        assert_eq!(payload.formatted_text, "ok");
    }

    #[tokio::test]
    async fn model_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;
        let app = router(
            ApiState {
                formatter: Some(formatter_for(server.uri())),
            },
            ApiConfig::default(),
        );
        let response = app.oneshot(post(r#"{"text":"shirt"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let payload: ErrorResponse = read_json(response).await;
        assert!(payload.error.contains("upstream down"));
    }

    #[tokio::test]
    async fn auth_token_guards_format_route_only() {
        let config = ApiConfig {
            rate_limit_per_second: None,
            auth_token: Some("letmein".into()),
        };
        let app = router(ApiState { formatter: None }, config);

        let response = app.clone().oneshot(post("shirt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/format-product")
                    .header(AUTHORIZATION, "Bearer wrong")
                    .body(Body::from("shirt"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/format-product")
                    .header(AUTHORIZATION, "Bearer letmein")
                    .body(Body::from("   "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rate_limit_rejects_burst() {
        let config = ApiConfig {
            rate_limit_per_second: Some(1),
            auth_token: None,
        };
        let app = router(ApiState { formatter: None }, config);

        let first = app.clone().oneshot(post("")).await.unwrap();
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);
        let second = app.oneshot(post("")).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let payload: ErrorResponse = read_json(second).await;
        assert_eq!(payload.error, "rate_limited");
    }

    #[tokio::test]
    async fn non_object_json_bodies_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = router(
            ApiState {
                formatter: Some(formatter_for(server.uri())),
            },
            ApiConfig::default(),
        );

        for body in ["null", "42", "[1,2]", "\"abc\"", r#"{"text":null}"#] {
            let response = app.clone().oneshot(post(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let payload: ErrorResponse = read_json(response).await;
            assert!(payload.error.starts_with("Invalid input: "), "{body}");
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_rejected_as_empty() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/format-product")
                    .body(Body::from(vec![0xff, 0xfe]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = read_json(response).await;
        assert_eq!(payload.error, "No input provided");
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let app = router(ApiState { formatter: None }, ApiConfig::default());
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(REQUEST_ID_HEADER, "trace-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-42");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(REQUEST_ID_HEADER, "has spaces")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "BEARER abc".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn rate_limiter_frees_slots_after_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));
        let start = Instant::now();
        assert!(limiter.try_acquire(start).await);
        assert!(limiter.try_acquire(start).await);
        assert!(!limiter.try_acquire(start + Duration::from_millis(500)).await);
        assert!(limiter.try_acquire(start + Duration::from_secs(1)).await);
    }

    proptest! {
        #[test]
        fn bearer_token_parses_from_header(token in "[A-Za-z0-9_-]{1,64}") {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
            prop_assert_eq!(extract_bearer_token(&headers), Some(token));
        }
    }
}
