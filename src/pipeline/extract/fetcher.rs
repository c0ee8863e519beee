//! 外部抓取能力 - URL进、HTML文档出

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::ExtractConfig;
use crate::pipeline::error::ExtractError;

/// 抓取能力的接缝，生产实现走reqwest，测试用桩实现替换
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个页面，返回原始HTML
    async fn fetch(&self, url: &str) -> Result<String, ExtractError>;
}

/// 基于reqwest的页面抓取实现
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(config: &ExtractConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// 是否允许抓取该URL（仅http(s)，拒绝回环与内网地址）
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        match parsed.host_str() {
            Some(host) => !is_private_host(&host.to_lowercase()),
            None => false,
        }
    }
}

fn is_private_host(host: &str) -> bool {
    if host == "localhost" || host == "0.0.0.0" {
        return true;
    }

    if let Ok(ip) = host.parse::<std::net::IpAddr>() {
        return match ip {
            std::net::IpAddr::V4(v4) => {
                v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
            }
            std::net::IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
        };
    }

    false
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        if !Self::is_safe_url(url) {
            return Err(ExtractError::UnsafeUrl);
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout
            } else {
                ExtractError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus {
                status: status.as_u16(),
            });
        }

        // 只接受HTML文档；图片、PDF等一律判为不可用信息源
        if let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or("").to_lowercase();
            if !content_type.is_empty()
                && !content_type.contains("html")
                && !content_type.contains("xhtml")
            {
                return Err(ExtractError::NotHtml(content_type));
            }
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout
            } else {
                ExtractError::Request(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_url_valid() {
        assert!(HttpPageFetcher::is_safe_url("https://example.com/page"));
        assert!(HttpPageFetcher::is_safe_url("http://news.example.org/a?b=c"));
    }

    #[test]
    fn test_is_safe_url_blocks_localhost_and_private() {
        assert!(!HttpPageFetcher::is_safe_url("http://localhost/admin"));
        assert!(!HttpPageFetcher::is_safe_url("http://127.0.0.1:8080/"));
        assert!(!HttpPageFetcher::is_safe_url("http://192.168.1.1/router"));
        assert!(!HttpPageFetcher::is_safe_url("http://10.0.0.1/internal"));
        assert!(!HttpPageFetcher::is_safe_url("http://172.16.0.1/private"));
        assert!(!HttpPageFetcher::is_safe_url("http://169.254.0.1/"));
        assert!(!HttpPageFetcher::is_safe_url("http://[::1]/"));
    }

    #[test]
    fn test_is_safe_url_blocks_other_schemes() {
        assert!(!HttpPageFetcher::is_safe_url("ftp://example.com/file"));
        assert!(!HttpPageFetcher::is_safe_url("file:///etc/passwd"));
        assert!(!HttpPageFetcher::is_safe_url("not a url"));
    }

    #[tokio::test]
    async fn test_fetch_unsafe_url_is_typed_failure() {
        let fetcher = HttpPageFetcher::new(&ExtractConfig::default());
        let result = fetcher.fetch("http://localhost/admin").await;
        assert!(matches!(result, Err(ExtractError::UnsafeUrl)));
    }
}
