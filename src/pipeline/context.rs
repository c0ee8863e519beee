use std::sync::Arc;

use anyhow::Result;

use crate::cache::FetchCache;
use crate::config::Config;
use crate::llm::client::LLMClient;
use crate::pipeline::extract::{HttpPageFetcher, PageFetcher};
use crate::pipeline::gather::{DuckDuckGoProvider, SearchProvider};
use crate::pipeline::write::{ArticleComposer, LlmComposer};

/// 流水线上下文 - 配置、进程级缓存与外部能力的装配点
///
/// 抓取缓存是唯一跨并发运行共享的可变状态；其余字段只读。搜索、
/// 抓取与写作能力以trait对象注入，生产与测试共用同一套流水线代码。
#[derive(Clone)]
pub struct PipelineContext {
    /// LLM调用器，用于与AI通信
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// 进程级抓取缓存
    pub fetch_cache: Arc<FetchCache>,
    /// 搜索能力
    pub searcher: Arc<dyn SearchProvider>,
    /// 页面抓取能力
    pub fetcher: Arc<dyn PageFetcher>,
    /// 写作能力
    pub composer: Arc<dyn ArticleComposer>,
}

impl PipelineContext {
    /// 以生产能力装配上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let searcher = Arc::new(DuckDuckGoProvider::new(config.gather.search_timeout_seconds));
        let fetcher = Arc::new(HttpPageFetcher::new(&config.extract));
        let composer = Arc::new(LlmComposer::new(llm_client.clone()));

        Ok(Self::with_capabilities(
            config, llm_client, searcher, fetcher, composer,
        ))
    }

    /// 以显式能力装配上下文，测试与嵌入场景使用
    pub fn with_capabilities(
        config: Config,
        llm_client: LLMClient,
        searcher: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        composer: Arc<dyn ArticleComposer>,
    ) -> Self {
        let fetch_cache = Arc::new(FetchCache::new(config.cache.clone()));
        Self {
            llm_client,
            config,
            fetch_cache,
            searcher,
            fetcher,
            composer,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::pipeline::error::ExtractError;
    use crate::types::{ArticleDraft, ResearchBundle};
    use async_trait::async_trait;

    /// 永远返回空结果的搜索桩
    pub struct NullSearcher;

    #[async_trait]
    impl SearchProvider for NullSearcher {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<crate::pipeline::gather::SearchHit>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "null"
        }
    }

    /// 永远失败的抓取桩
    pub struct NullFetcher;

    #[async_trait]
    impl PageFetcher for NullFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, ExtractError> {
            Err(ExtractError::UnsafeUrl)
        }
    }

    /// 永远失败的写作桩
    pub struct NullComposer;

    #[async_trait]
    impl ArticleComposer for NullComposer {
        async fn compose(&self, _topic: &str, _bundle: &ResearchBundle) -> Result<ArticleDraft> {
            Err(anyhow::anyhow!("no model in tests"))
        }

        async fn revise(
            &self,
            _topic: &str,
            _bundle: &ResearchBundle,
            _prior: &ArticleDraft,
            _violations: &[String],
        ) -> Result<ArticleDraft> {
            Err(anyhow::anyhow!("no model in tests"))
        }
    }
}

#[cfg(test)]
impl PipelineContext {
    /// 单元测试用上下文：默认配置、禁用缓存、空桩能力
    pub(crate) fn for_tests() -> Self {
        use test_support::{NullComposer, NullFetcher, NullSearcher};

        let mut config = Config::default();
        config.cache.enabled = false;

        let llm_client = LLMClient::new(config.clone()).expect("test llm client");
        Self::with_capabilities(
            config,
            llm_client,
            Arc::new(NullSearcher),
            Arc::new(NullFetcher),
            Arc::new(NullComposer),
        )
    }
}
