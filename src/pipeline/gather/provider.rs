//! 外部搜索能力 - 查询进、带标题的URL列表出

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// 搜索引擎返回的单条结果
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

/// 搜索能力的接缝，生产实现走DuckDuckGo，测试用桩实现替换
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 执行一次查询，可能失败或返回空列表
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &'static str;
}

/// DuckDuckGo HTML端点搜索，无需API KEY
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
}

impl DuckDuckGoProvider {
    pub fn new(timeout_seconds: u64) -> Self {
        // 使用常规浏览器UA，避免被端点直接拒绝
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(DDG_HTML_URL)
            .form(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("search endpoint returned {}", status));
        }

        let html = response.text().await?;
        Ok(parse_result_page(&html, limit))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// 解析DuckDuckGo结果页，提取标题链接
fn parse_result_page(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let link_selector = match Selector::parse("a.result__a") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut hits = Vec::new();
    for link in document.select(&link_selector) {
        if hits.len() >= limit {
            break;
        }

        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_redirect_url(href) else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        hits.push(SearchHit { url, title });
    }

    hits
}

/// 还原DuckDuckGo跳转链接中的真实URL
///
/// 结果页的href形如`//duckduckgo.com/l/?uddg=https%3A%2F%2F...`，
/// 真实地址百分号编码在uddg参数里；直链则原样返回。
fn resolve_redirect_url(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        return None;
    };

    let parsed = Url::parse(&absolute).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.to_string())
}
