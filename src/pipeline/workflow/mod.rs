//! 流水线协调器 - 唯一知晓完整阶段序列的组件
//!
//! 主题 → 搜集 → 提取 → 聚合 → 写作 → 成文。状态只向前推进；任一
//! 阶段失败即携带类型化错误终止，绝不返回半成品文章。

use std::time::Duration;

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::llm::client::LLMClient;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::{PipelineError, Stage};
use crate::pipeline::extract::HttpPageFetcher;
use crate::pipeline::gather::DuckDuckGoProvider;
use crate::pipeline::run::{PipelineRun, PipelineState};
use crate::pipeline::write::LlmComposer;
use crate::pipeline::{aggregate, extract, gather, write};
use crate::types::Article;

/// 启动一次完整的文章生成
///
/// 装配生产能力、检查模型连接后执行流水线。CLI一次性生成路径的
/// 入口；常驻服务复用`PipelineContext`并直接调用[`run`]。
pub async fn launch(config: &Config, topic: &str) -> Result<Article> {
    let llm_client = LLMClient::new(config.clone())?;

    // 启动时检查模型连接
    llm_client.check_connection().await?;

    let context = PipelineContext::with_capabilities(
        config.clone(),
        llm_client.clone(),
        Arc::new(DuckDuckGoProvider::new(config.gather.search_timeout_seconds)),
        Arc::new(HttpPageFetcher::new(&config.extract)),
        Arc::new(LlmComposer::new(llm_client)),
    );

    Ok(run(&context, topic).await?)
}

/// 执行一次流水线运行
pub async fn run(context: &PipelineContext, topic: &str) -> Result<Article, PipelineError> {
    let mut pipeline_run = PipelineRun::new(topic);

    match drive(context, &mut pipeline_run).await {
        Ok(article) => {
            pipeline_run.advance(PipelineState::Done);
            println!(
                "✅ 博客文章生成完成 [{}]，共 {} 条引用",
                pipeline_run.id,
                article.citations.len()
            );
            Ok(article)
        }
        Err(error) => {
            pipeline_run.fail(&error);
            eprintln!("❌ 流水线运行 [{}] 终止: {}", pipeline_run.id, error);
            Err(error)
        }
    }
}

/// 带取消信号执行一次流水线运行
///
/// `cancel`就绪时整个运行future被drop：未完成的抓取与模型调用随之
/// 中止，不会遗留后台任务。
pub async fn run_with_cancel(
    context: &PipelineContext,
    topic: &str,
    cancel: impl std::future::Future<Output = ()>,
) -> Result<Article, PipelineError> {
    tokio::select! {
        result = run(context, topic) => result,
        _ = cancel => {
            eprintln!("⚠️ 运行被调用方中止: {}", topic);
            Err(PipelineError::Cancelled)
        }
    }
}

/// 依序驱动各阶段，状态严格向前
async fn drive(
    context: &PipelineContext,
    pipeline_run: &mut PipelineRun,
) -> Result<Article, PipelineError> {
    let topic = pipeline_run.topic.trim().to_string();
    if topic.is_empty() {
        return Err(PipelineError::EmptyTopic);
    }

    println!("🚀 开始生成博客文章 [{}]: {}", pipeline_run.id, topic);

    // 搜集：内部已有单查询超时，这里的预算是阶段级兜底
    let gather_config = &context.config.gather;
    let query_count = if gather_config.include_news_variant { 2 } else { 1 };
    let gather_budget =
        Duration::from_secs(gather_config.search_timeout_seconds * query_count + 5);
    let candidates = with_stage_budget(
        Stage::Gathering,
        gather_budget,
        gather::execute(context, &topic),
    )
    .await?;

    pipeline_run.advance(PipelineState::Extracting);
    let extract_budget =
        Duration::from_secs(context.config.extract.total_timeout_seconds + 10);
    let outcomes = with_stage_budget(Stage::Extracting, extract_budget, async {
        Ok(extract::execute(context, &candidates).await)
    })
    .await?;

    pipeline_run.advance(PipelineState::Aggregating);
    let bundle = aggregate::execute(context, &topic, &candidates, outcomes)?;

    pipeline_run.advance(PipelineState::Writing);
    let article = write::execute(context, &topic, &bundle).await?;

    if context.config.verbose {
        let stats = context.fetch_cache.stats();
        println!(
            "   📊 缓存统计: {} 命中 / {} 未命中 / {} 写入",
            stats.hits, stats.misses, stats.writes
        );
    }

    Ok(article)
}

/// 阶段级时间预算兜底；正常情况下阶段内部策略先于它触发
async fn with_stage_budget<T>(
    stage: Stage,
    budget: Duration,
    stage_future: impl std::future::Future<Output = Result<T, PipelineError>>,
) -> Result<T, PipelineError> {
    match tokio::time::timeout(budget, stage_future).await {
        Ok(result) => result,
        Err(_) => Err(PipelineError::Timeout { stage }),
    }
}
