//! 正文提取阶段 - 并发抓取候选页面，经缓存去重后剥离出正文

use chrono::Utc;
use futures::StreamExt;
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::ExtractError;
use crate::types::{ExtractedContent, ExtractionFailure, SourceCandidate};

pub mod fetcher;
pub mod html;

pub use fetcher::{HttpPageFetcher, PageFetcher};

/// 执行提取阶段
///
/// 各候选的抓取互相独立，以有界并发执行；整个阶段受总超时约束，
/// 截止后未完成的URL记为超时失败。返回值与输入候选一一对应，
/// 失败以类型化的`ExtractionFailure`表达，绝不中断整次运行。
pub async fn execute(
    context: &PipelineContext,
    candidates: &[SourceCandidate],
) -> Vec<Result<ExtractedContent, ExtractionFailure>> {
    let config = &context.config.extract;
    let deadline = Instant::now() + Duration::from_secs(config.total_timeout_seconds);

    let outcomes: Vec<Result<ExtractedContent, ExtractionFailure>> =
        futures::stream::iter(candidates.iter().cloned().map(|candidate| {
            async move { extract_one(context, &candidate, deadline).await }
        }))
        .buffered(config.max_parallels.max(1))
        .collect()
        .await;

    let succeeded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    println!(
        "📄 正文提取完成: {} 成功 / {} 失败",
        succeeded,
        outcomes.len() - succeeded
    );

    outcomes
}

/// 提取单个候选的正文：查缓存 → 抓取 → 剥离噪声 → 回写缓存
///
/// 失败后按原因决定是否重试，至多一次，带固定间隔加抖动。
async fn extract_one(
    context: &PipelineContext,
    candidate: &SourceCandidate,
    deadline: Instant,
) -> Result<ExtractedContent, ExtractionFailure> {
    let config = &context.config.extract;

    if let Some(cached) = context.fetch_cache.get(&candidate.url).await {
        if context.config.verbose {
            println!("   ♻️ 缓存命中: {}", candidate.url);
        }
        return Ok(cached);
    }

    let mut attempted_retry = false;
    loop {
        let attempt = fetch_and_extract(context, candidate);
        let result = match tokio::time::timeout_at(deadline, attempt).await {
            Ok(result) => result,
            Err(_) => Err(ExtractError::Timeout),
        };

        match result {
            Ok(content) => {
                // 缓存写入失败无妨，流水线不依赖缓存命中
                let _ = context.fetch_cache.put(&candidate.url, &content).await;
                return Ok(content);
            }
            Err(reason) => {
                let out_of_time = Instant::now() >= deadline;
                if attempted_retry || out_of_time || !reason.is_retryable() {
                    if context.config.verbose {
                        println!("   ⚠️ 提取失败 {}: {}", candidate.url, reason);
                    }
                    return Err(ExtractionFailure {
                        url: candidate.url.clone(),
                        reason,
                    });
                }

                attempted_retry = true;
                let jitter = rand::rng().random_range(0..=250);
                tokio::time::sleep(Duration::from_millis(config.retry_delay_ms + jitter)).await;
            }
        }
    }
}

async fn fetch_and_extract(
    context: &PipelineContext,
    candidate: &SourceCandidate,
) -> Result<ExtractedContent, ExtractError> {
    let config = &context.config.extract;

    let html = context.fetcher.fetch(&candidate.url).await?;
    let text = html::extract_main_content(&html, config.max_content_chars);

    if text.len() < config.min_content_chars {
        return Err(ExtractError::EmptyContent);
    }

    Ok(ExtractedContent {
        url: candidate.url.clone(),
        text,
        fetched_at: Utc::now(),
        from_cache: false,
    })
}
