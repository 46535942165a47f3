//! HTTP routes

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use sentiment_core::AnalysisResult;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::error::Result;
use crate::state::{SharedState, VERSION};

const SERVICE_NAME: &str = "News Sentiment Service";

/// Models advertised when the provider cannot list its own
const FALLBACK_MODELS: [&str; 2] = ["gpt-3.5-turbo", "gpt-4"];

const OFFLINE_MODEL: &str = "mock-model";

/// Body of `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct NewsAnalysisRequest {
    pub symbol: String,
    pub news_items: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
    status: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
    uptime: f64,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    service: &'static str,
    version: &'static str,
    status: &'static str,
    uptime: f64,
    provider_available: bool,
    model: String,
    timestamp: DateTime<Utc>,
}

/// Build the service router with permissive CORS
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/models", get(models))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        version: VERSION,
        status: "running",
        timestamp: Utc::now(),
    })
}

async fn analyze(
    State(state): State<SharedState>,
    Json(request): Json<NewsAnalysisRequest>,
) -> Result<Json<AnalysisResult>> {
    info!(
        symbol = %request.symbol,
        news_count = request.news_items.len(),
        "Analysis request received"
    );

    let result = state
        .analyzer()
        .classify(&request.symbol, &request.news_items)
        .await?;

    info!(
        symbol = result.symbol(),
        sentiment = %result.sentiment(),
        confidence = result.confidence_score(),
        "Analysis completed"
    );

    Ok(Json(result))
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: VERSION,
        uptime: state.uptime(),
    })
}

async fn status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let analyzer = state.analyzer();
    Json(StatusResponse {
        service: SERVICE_NAME,
        version: VERSION,
        status: "running",
        uptime: state.uptime(),
        provider_available: analyzer.has_provider(),
        model: analyzer.model().to_string(),
        timestamp: Utc::now(),
    })
}

async fn models(State(state): State<SharedState>) -> Json<Value> {
    let analyzer = state.analyzer();
    let Some(provider) = analyzer.provider() else {
        return Json(json!({
            "models": [OFFLINE_MODEL],
            "default_model": OFFLINE_MODEL,
            "note": "No LLM provider configured, using the keyword heuristic",
        }));
    };

    match provider.list_models().await {
        Ok(models) => Json(json!({
            "models": models,
            "default_model": analyzer.model(),
        })),
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "Failed to list models");
            Json(json!({
                "models": FALLBACK_MODELS,
                "default_model": analyzer.model(),
                "error": e.to_string(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use sentiment_core::{SentimentAnalyzer, SentimentConfig};
    use sentiment_llm::{CompletionRequest, CompletionResponse, LLMError, LLMProvider};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Provider whose replies are fixed up front
    struct CannedProvider {
        reply: &'static str,
        models: Option<Vec<String>>,
    }

    #[async_trait]
    impl LLMProvider for CannedProvider {
        async fn complete(&self, _request: CompletionRequest) -> sentiment_llm::Result<CompletionResponse> {
            Ok(CompletionResponse::from_text(self.reply))
        }

        async fn list_models(&self) -> sentiment_llm::Result<Vec<String>> {
            self.models
                .clone()
                .ok_or_else(|| LLMError::RequestFailed("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn config() -> SentimentConfig {
        SentimentConfig::builder().model("gpt-test").build().unwrap()
    }

    fn offline_app() -> Router {
        let analyzer = SentimentAnalyzer::new(&config(), None).unwrap();
        router(AppState::new(analyzer))
    }

    fn app_with(provider: CannedProvider) -> Router {
        let analyzer = SentimentAnalyzer::new(&config(), Some(Arc::new(provider))).unwrap();
        router(AppState::new(analyzer))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }

    async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root() {
        let (status, body) = get_json(offline_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], SERVICE_NAME);
        assert_eq!(body["status"], "running");
        assert_eq!(body["version"], VERSION);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_without_provider_uses_heuristic() {
        let (status, body) = post_json(
            offline_app(),
            "/analyze",
            &json!({ "symbol": "AAPL", "news_items": ["苹果发布新iPhone", "科技股上涨"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "AAPL");
        assert_eq!(body["sentiment"], "Positive");
        assert_eq!(body["confidence_score"], 0.7);
        assert!(body["reason"].as_str().unwrap().contains('1'));
    }

    #[tokio::test]
    async fn test_analyze_with_provider() {
        let app = app_with(CannedProvider {
            reply: r#"{"sentiment": "Negative", "reason": "盈利预警", "confidence_score": 0.9}"#,
            models: None,
        });
        let (status, body) = post_json(
            app,
            "/analyze",
            &json!({ "symbol": "XYZ", "news_items": ["公司发布盈利预警"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sentiment"], "Negative");
        assert_eq!(body["reason"], "盈利预警");
        assert_eq!(body["confidence_score"], 0.9);
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_news() {
        let (status, body) =
            post_json(offline_app(), "/analyze", &json!({ "symbol": "AAPL", "news_items": [] })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("news"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_blank_symbol() {
        let (status, body) =
            post_json(offline_app(), "/analyze", &json!({ "symbol": "  ", "news_items": ["利好"] })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"symbol": "AAPL"}"#))
            .unwrap();
        let response = offline_app().oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(offline_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_status_reports_provider() {
        let (_, body) = get_json(offline_app(), "/status").await;
        assert_eq!(body["provider_available"], false);
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["service"], SERVICE_NAME);

        let app = app_with(CannedProvider { reply: "", models: None });
        let (_, body) = get_json(app, "/status").await;
        assert_eq!(body["provider_available"], true);
    }

    #[tokio::test]
    async fn test_models_without_provider() {
        let (status, body) = get_json(offline_app(), "/models").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["models"], json!(["mock-model"]));
        assert_eq!(body["default_model"], "mock-model");
        assert!(body["note"].is_string());
    }

    #[tokio::test]
    async fn test_models_from_provider() {
        let app = app_with(CannedProvider {
            reply: "",
            models: Some(vec!["gpt-test".to_string(), "gpt-4o".to_string()]),
        });
        let (_, body) = get_json(app, "/models").await;

        assert_eq!(body["models"], json!(["gpt-test", "gpt-4o"]));
        assert_eq!(body["default_model"], "gpt-test");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_models_fallback_on_listing_error() {
        let app = app_with(CannedProvider { reply: "", models: None });
        let (_, body) = get_json(app, "/models").await;

        assert_eq!(body["models"], json!(["gpt-3.5-turbo", "gpt-4"]));
        assert_eq!(body["default_model"], "gpt-test");
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://dashboard.example")
            .body(Body::empty())
            .unwrap();
        let response = offline_app().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
