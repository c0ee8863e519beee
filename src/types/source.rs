use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::error::ExtractError;
use crate::utils::url_normalizer::normalize_url;

/// 候选信息源 - 由搜集阶段产出，单次运行内按规范化URL去重
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceCandidate {
    /// 原始URL
    pub url: String,
    /// 页面标题
    pub title: String,
    /// 搜索引擎返回的位次（0为最前）
    pub rank: usize,
    /// 产生该候选的查询语句
    pub query: String,
}

impl SourceCandidate {
    /// 获取用于去重和缓存的规范化URL
    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }
}

/// 提取到的正文内容 - 缓存中按规范化URL持有只读副本
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractedContent {
    /// 原始URL
    pub url: String,
    /// 去除模板噪声后的正文文本
    pub text: String,
    /// 抓取时间
    pub fetched_at: DateTime<Utc>,
    /// 是否来自缓存命中
    #[serde(default)]
    pub from_cache: bool,
}

/// 单个URL的提取失败信息 - 对整次运行非致命
#[derive(Debug)]
pub struct ExtractionFailure {
    pub url: String,
    pub reason: ExtractError,
}
