//! 写作阶段 - 调用模型将研究素材合成为带引用的博客文章

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::WriterConfig;
use crate::llm::client::LLMClient;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::types::{Article, ArticleDraft, ResearchBundle};
use crate::utils::url_normalizer::normalize_url;

/// 写作能力的接缝，生产实现走LLM，测试用桩实现替换
#[async_trait]
pub trait ArticleComposer: Send + Sync {
    /// 基于主题与素材包撰写结构化草稿
    async fn compose(&self, topic: &str, bundle: &ResearchBundle) -> Result<ArticleDraft>;

    /// 针对上一稿的契约违规进行一次纠正性重写
    async fn revise(
        &self,
        topic: &str,
        bundle: &ResearchBundle,
        prior: &ArticleDraft,
        violations: &[String],
    ) -> Result<ArticleDraft>;
}

/// 执行写作阶段
///
/// 草稿必须通过结构校验：正文达到最小长度与分节数，且每条引用的
/// URL都出自素材包。违规草稿获得一次携带违规清单的纠正性重写机会，
/// 仍不合格或模型能力本身失效时以`WritingFailed`终止。
pub async fn execute(
    context: &PipelineContext,
    topic: &str,
    bundle: &ResearchBundle,
) -> Result<Article, PipelineError> {
    let config = &context.config.writer;
    let call_budget = Duration::from_secs(context.config.llm.timeout_seconds);

    let draft = compose_with_budget(context.composer.compose(topic, bundle), call_budget).await?;

    let violations = validate_draft(&draft, bundle, config);
    if violations.is_empty() {
        println!("✍️ 文章撰写完成");
        return Ok(Article::from(draft));
    }

    eprintln!("⚠️ 草稿违反写作契约，进行纠正性重写: {}", violations.join("; "));
    let revised = compose_with_budget(
        context.composer.revise(topic, bundle, &draft, &violations),
        call_budget,
    )
    .await?;

    let violations = validate_draft(&revised, bundle, config);
    if !violations.is_empty() {
        return Err(PipelineError::WritingFailed(format!(
            "draft still violates the contract after one revision: {}",
            violations.join("; ")
        )));
    }

    println!("✍️ 文章撰写完成");
    Ok(Article::from(revised))
}

async fn compose_with_budget(
    call: impl std::future::Future<Output = Result<ArticleDraft>>,
    budget: Duration,
) -> Result<ArticleDraft, PipelineError> {
    match tokio::time::timeout(budget, call).await {
        Ok(Ok(draft)) => Ok(draft),
        Ok(Err(e)) => Err(PipelineError::WritingFailed(e.to_string())),
        Err(_) => Err(PipelineError::WritingFailed(
            "model call exceeded its time budget".to_string(),
        )),
    }
}

/// 校验草稿是否满足写作契约，返回违规清单
pub fn validate_draft(
    draft: &ArticleDraft,
    bundle: &ResearchBundle,
    config: &WriterConfig,
) -> Vec<String> {
    let mut violations = Vec::new();

    let body = draft.body.trim();
    if body.chars().count() < config.min_body_chars {
        violations.push(format!(
            "body has fewer than {} characters",
            config.min_body_chars
        ));
    }

    let section_count = body
        .lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .count();
    if section_count < config.min_sections {
        violations.push(format!(
            "body has {} markdown sections, at least {} required",
            section_count, config.min_sections
        ));
    }

    if draft.citations.is_empty() {
        violations.push("article carries no citations".to_string());
    }

    // 引用的URL必须出自素材包；凭空引用是契约违规
    let allowed: HashSet<String> = bundle.normalized_urls().into_iter().collect();
    for citation in &draft.citations {
        if !allowed.contains(&normalize_url(&citation.source_url)) {
            violations.push(format!(
                "citation references an unlisted url: {}",
                citation.source_url
            ));
        }
    }

    violations
}

/// 基于LLM的写作实现
pub struct LlmComposer {
    llm_client: LLMClient,
}

impl LlmComposer {
    pub fn new(llm_client: LLMClient) -> Self {
        Self { llm_client }
    }

    fn system_prompt() -> String {
        r#"You are an elite blog content creator combining journalistic rigor with digital marketing expertise.

Write an engaging, well-structured blog post in markdown:
1. Craft an attention-grabbing headline as the top-level heading.
2. Open with a compelling introduction, develop the topic across several subheaded sections, and close with key takeaways.
3. Ground every factual claim in the provided source material and attribute it through the citations list.
4. Balance expertise with accessibility; optimize structure for digital consumption.

Return the result as structured data: `body` holds the full markdown text, `citations` lists each supported claim with the URL of the source backing it. Only URLs from the provided source material may appear in citations."#
            .to_string()
    }

    fn compose_prompt(topic: &str, bundle: &ResearchBundle) -> String {
        let mut prompt = format!("# Topic\n{}\n\n# Source material\n", topic);
        for (i, entry) in bundle.entries.iter().enumerate() {
            prompt.push_str(&format!(
                "## Source {}\nURL: {}\nTitle: {}\nExcerpt: {}\n\n",
                i + 1,
                entry.candidate.url,
                entry.candidate.title,
                entry.excerpt
            ));
        }
        prompt.push_str(
            "Write the blog post now. Cite only the URLs listed above; do not invent sources.",
        );
        prompt
    }

    fn revision_prompt(
        topic: &str,
        bundle: &ResearchBundle,
        prior: &ArticleDraft,
        violations: &[String],
    ) -> String {
        format!(
            "{}\n\n# Previous draft\n{}\n\n# Contract violations to fix\n{}\n\nRewrite the post so that every violation above is resolved. Keep what was already good.",
            Self::compose_prompt(topic, bundle),
            prior.body,
            violations
                .iter()
                .map(|violation| format!("- {}", violation))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

#[async_trait]
impl ArticleComposer for LlmComposer {
    async fn compose(&self, topic: &str, bundle: &ResearchBundle) -> Result<ArticleDraft> {
        self.llm_client
            .extract::<ArticleDraft>(
                &Self::system_prompt(),
                &Self::compose_prompt(topic, bundle),
            )
            .await
    }

    async fn revise(
        &self,
        topic: &str,
        bundle: &ResearchBundle,
        prior: &ArticleDraft,
        violations: &[String],
    ) -> Result<ArticleDraft> {
        self.llm_client
            .extract::<ArticleDraft>(
                &Self::system_prompt(),
                &Self::revision_prompt(topic, bundle, prior, violations),
            )
            .await
    }
}
