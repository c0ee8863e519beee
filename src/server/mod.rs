//! HTTP服务 - 流水线的薄封装
//!
//! 只做路由装配、请求解码与失败类别到状态码的映射，不承载任何
//! 流水线逻辑。`/health`仅探活，不触达流水线。

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::workflow;

#[derive(Clone)]
pub struct AppState {
    context: Arc<PipelineContext>,
}

#[derive(Deserialize)]
struct RunRequest {
    topic: String,
}

#[derive(Serialize)]
struct RunResponse {
    response: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// 启动HTTP服务
pub async fn serve(config: Config) -> Result<()> {
    let context = PipelineContext::new(config.clone())?;

    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    let router = create_router(AppState {
        context: Arc::new(context),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    println!("🌐 HTTP服务已启动: http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

/// 装配路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/workflow/run", post(run_workflow))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "health": "Ok" }))
}

/// 执行一次文章生成
///
/// 调用方断开连接时axum会drop本handler的future，流水线内未完成的
/// 抓取与模型调用随之中止，不会遗留后台任务。
async fn run_workflow(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Response {
    match workflow::run(&state.context, &request.topic).await {
        Ok(article) => (
            StatusCode::OK,
            Json(RunResponse {
                response: article.render_markdown(),
            }),
        )
            .into_response(),
        Err(error) => failure_response(&error),
    }
}

/// 每种失败类别映射到各自的状态码，绝不以2xx伪装失败
fn failure_response(error: &PipelineError) -> Response {
    let status = match error {
        PipelineError::EmptyTopic => StatusCode::BAD_REQUEST,
        PipelineError::NoSourcesFound => StatusCode::NOT_FOUND,
        PipelineError::InsufficientResearch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::WritingFailed(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        PipelineError::Cancelled => StatusCode::REQUEST_TIMEOUT,
    };

    (
        status,
        Json(ErrorBody {
            error: error.kind(),
            message: error.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LLMClient;
    use crate::pipeline::context::test_support::{NullComposer, NullFetcher, NullSearcher};
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    fn stub_state() -> AppState {
        let mut config = Config::default();
        config.cache.enabled = false;
        let llm_client = LLMClient::new(config.clone()).unwrap();
        let context = PipelineContext::with_capabilities(
            config,
            llm_client,
            Arc::new(NullSearcher),
            Arc::new(NullFetcher),
            Arc::new(NullComposer),
        );
        AppState {
            context: Arc::new(context),
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_does_not_touch_pipeline() {
        let router = create_router(stub_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Ok"));
    }

    #[tokio::test]
    async fn test_empty_topic_maps_to_bad_request() {
        let router = create_router(stub_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/workflow/run")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"topic": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("empty_topic"));
    }

    #[tokio::test]
    async fn test_no_sources_maps_to_not_found() {
        let router = create_router(stub_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/workflow/run")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"topic": "rust async"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("no_sources_found"));
    }

    #[tokio::test]
    async fn test_failure_statuses_are_distinct() {
        let failures = [
            PipelineError::EmptyTopic,
            PipelineError::NoSourcesFound,
            PipelineError::InsufficientResearch {
                found: 1,
                required: 2,
            },
            PipelineError::WritingFailed("x".to_string()),
            PipelineError::Timeout {
                stage: crate::pipeline::error::Stage::Writing,
            },
            PipelineError::Cancelled,
        ];

        let mut statuses: Vec<u16> = failures
            .iter()
            .map(|error| failure_response(error).status().as_u16())
            .collect();
        statuses.sort();
        statuses.dedup();
        assert_eq!(statuses.len(), failures.len());
        assert!(statuses.iter().all(|status| *status >= 400));
    }
}
