use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use burrow_core::repository::Result as StorageResult;
use burrow_core::{
    Origin, ReadRepository, Repository, ShortCode, ShortCodeRecord,
};
use burrow_gateway::model::{ErrorBody, HealthResponse, ShortenResponse};
use burrow_gateway::{App, AppState};
use burrow_generator::{Generator, RandomGenerator};
use burrow_redirector::RedirectorService;
use burrow_shortener::{ShortenerConfig, ShortenerService};
use burrow_storage::InMemoryRepository;
use serde_json::json;
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:8080";

fn state_with<R, G>(repository: Arc<R>, generator: G, timeout: Option<Duration>) -> AppState
where
    R: Repository,
    G: Generator,
{
    let config = ShortenerConfig::builder().public_host("localhost").build();
    let shortener = ShortenerService::with_config(Arc::clone(&repository), generator, config);
    let redirector = RedirectorService::from_shared(repository);

    let state = AppState::new(Arc::new(shortener), Arc::new(redirector), BASE_URL);
    match timeout {
        Some(timeout) => state.with_request_timeout(timeout),
        None => state,
    }
}

fn app() -> Router {
    App::router(state_with(
        Arc::new(InMemoryRepository::new()),
        RandomGenerator::new(),
        None,
    ))
}

fn shorten_request(path: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn shorten(app: &Router, body: serde_json::Value) -> Response {
    app.clone()
        .oneshot(shorten_request("/api/v1/shorten", body))
        .await
        .unwrap()
}

#[derive(Debug)]
struct FixedGenerator(&'static str);

impl Generator for FixedGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        ShortCode::new_unchecked(self.0)
    }
}

/// Delays every read past any reasonable deadline.
#[derive(Debug, Default)]
struct SlowRepository {
    inner: InMemoryRepository,
}

#[async_trait]
impl ReadRepository for SlowRepository {
    async fn get(&self, code: &ShortCode) -> StorageResult<Option<ShortCodeRecord>> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        self.inner.get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> StorageResult<bool> {
        self.inner.exists(code).await
    }

    async fn find_by_long_url(&self, long_url: &str) -> StorageResult<Option<ShortCodeRecord>> {
        self.inner.find_by_long_url(long_url).await
    }
}

#[async_trait]
impl Repository for SlowRepository {
    async fn insert_if_absent(&self, record: ShortCodeRecord) -> StorageResult<ShortCodeRecord> {
        self.inner.insert_if_absent(record).await
    }
}

#[tokio::test]
async fn shorten_returns_a_generated_code() {
    let app = app();

    let response = shorten(&app, json!({ "longUrl": "https://example.com/a" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ShortenResponse = json_body(response).await;
    assert_eq!(body.short_code.len(), 7);
    assert!(body.short_code.bytes().all(|b| b.is_ascii_alphanumeric()));
    assert_eq!(body.short_url, format!("{BASE_URL}/{}", body.short_code));
    assert_eq!(body.long_url, "https://example.com/a");
    assert_eq!(body.origin, Origin::Generated);
}

#[tokio::test]
async fn redirect_is_permanent_with_cache_headers() {
    let app = app();

    let created: ShortenResponse =
        json_body(shorten(&app, json!({ "longUrl": "https://example.com/a?b=c" })).await).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/{}", created.short_code)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    let headers = response.headers();
    assert_eq!(headers[header::LOCATION], "https://example.com/a?b=c");
    assert_eq!(headers[header::CACHE_CONTROL], "private, max-age=90");
    assert_eq!(headers["x-robots-tag"], "noindex");
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = app();

    let response = app.clone().oneshot(get("/zzzzzzz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = json_body(response).await;
    assert_eq!(body.error.kind, "not_found");

    // Too short to be any code.
    let response = app.clone().oneshot(get("/ab")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/shorten")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = json_body(response).await;
    assert_eq!(body.error.kind, "invalid_input");

    let response = shorten(&app, json!({ "customAlias": "promo" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for long_url in ["", "ftp://example.com/file", "example.com", "http://localhost:8080/abc"] {
        let response = shorten(&app, json!({ "longUrl": long_url })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{long_url}");
    }

    let response = shorten(
        &app,
        json!({ "longUrl": "https://example.com", "customAlias": "bad alias!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn taken_alias_conflicts() {
    let app = app();

    let response = shorten(
        &app,
        json!({ "longUrl": "https://example.com/a", "customAlias": "promo" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: ShortenResponse = json_body(response).await;
    assert_eq!(body.short_code, "promo");
    assert_eq!(body.origin, Origin::Custom);

    let response = shorten(
        &app,
        json!({ "longUrl": "https://example.com/b", "customAlias": "promo" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: ErrorBody = json_body(response).await;
    assert_eq!(body.error.kind, "alias_taken");

    // The first owner keeps the alias.
    let response = app.clone().oneshot(get("/promo")).await.unwrap();
    assert_eq!(response.headers()[header::LOCATION], "https://example.com/a");
}

#[tokio::test]
async fn concurrent_alias_requests_have_one_winner() {
    let app = app();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                shorten(
                    &app,
                    json!({
                        "longUrl": format!("https://example.com/{i}"),
                        "customAlias": "launch",
                    }),
                )
                .await
                .status()
            })
        })
        .collect();

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, 9);
}

#[tokio::test]
async fn saturated_generator_is_unavailable() {
    let repository = Arc::new(InMemoryRepository::new());
    repository
        .insert_if_absent(ShortCodeRecord::new(
            ShortCode::new_unchecked("aaaaaaa"),
            "https://example.com/taken".to_string(),
            Origin::Generated,
        ))
        .await
        .unwrap();
    let app = App::router(state_with(repository, FixedGenerator("aaaaaaa"), None));

    let response = shorten(&app, json!({ "longUrl": "https://example.com/new" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: ErrorBody = json_body(response).await;
    assert_eq!(body.error.kind, "generation_exhausted");
}

#[tokio::test]
async fn slow_lookup_times_out() {
    let repository = Arc::new(SlowRepository::default());
    let app = App::router(state_with(
        repository,
        RandomGenerator::new(),
        Some(Duration::from_millis(50)),
    ));

    let created: ShortenResponse =
        json_body(shorten(&app, json!({ "longUrl": "https://example.com/slow" })).await).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/{}", created.short_code)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: ErrorBody = json_body(response).await;
    assert_eq!(body.error.kind, "timeout");
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: HealthResponse = json_body(response).await;
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn create_endpoint_path_is_configurable() {
    let app = App::router_with_api_path(
        state_with(
            Arc::new(InMemoryRepository::new()),
            RandomGenerator::new(),
            None,
        ),
        "/shorten",
    );

    let response = app
        .clone()
        .oneshot(shorten_request(
            "/shorten",
            json!({ "longUrl": "https://example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(shorten_request(
            "/api/v1/shorten",
            json!({ "longUrl": "https://example.com" }),
        ))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::OK);
}
