use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use crate::config::CacheConfig;
use crate::types::ExtractedContent;
use crate::utils::url_normalizer::normalize_url;

/// 抓取缓存 - 以规范化URL为键的进程级内容存储
///
/// 条目只追加不原地修改，仅按TTL过期淘汰。存储不可用时静默退化为
/// 全未命中，流水线的正确性从不依赖缓存命中。
pub struct FetchCache {
    config: CacheConfig,
    stats: CacheStats,
}

/// 缓存条目，磁盘上的JSON布局
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    /// 规范化后的URL，用于人工排查
    pub url: String,
    /// 提取后的正文文本
    pub text: String,
    /// 抓取时间
    pub fetched_at: DateTime<Utc>,
}

/// 缓存命中统计
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub errors: u64,
}

impl FetchCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            stats: CacheStats::default(),
        }
    }

    /// 生成规范化URL的MD5哈希，作为缓存文件名
    fn hash_key(normalized: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(normalized.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// 获取缓存文件路径
    fn entry_path(&self, normalized: &str) -> PathBuf {
        self.config
            .cache_dir
            .join("pages")
            .join(format!("{}.json", Self::hash_key(normalized)))
    }

    /// 检查条目是否过期
    fn is_expired(&self, fetched_at: DateTime<Utc>) -> bool {
        Utc::now() - fetched_at > Duration::hours(self.config.expire_hours as i64)
    }

    /// 查询缓存，仅在条目存在且未过期时命中
    pub async fn get(&self, url: &str) -> Option<ExtractedContent> {
        if !self.config.enabled {
            return None;
        }

        let normalized = normalize_url(url);
        let path = self.entry_path(&normalized);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&content) {
            Ok(entry) => {
                if self.is_expired(entry.fetched_at) {
                    // 删除过期缓存
                    let _ = fs::remove_file(&path).await;
                    self.stats.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }

                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(ExtractedContent {
                    url: entry.url,
                    text: entry.text,
                    fetched_at: entry.fetched_at,
                    from_cache: true,
                })
            }
            Err(_) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// 写入缓存
    ///
    /// 当既有条目仍在TTL内，或其抓取时间不早于新条目时为空操作，
    /// 即优先保留更早的成功抓取。写入经由临时文件加重命名完成，
    /// 保证并发运行下的单键原子性。
    pub async fn put(&self, url: &str, content: &ExtractedContent) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let normalized = normalize_url(url);
        let path = self.entry_path(&normalized);

        if let Ok(existing) = fs::read_to_string(&path).await
            && let Ok(entry) = serde_json::from_str::<CacheEntry>(&existing)
            && (!self.is_expired(entry.fetched_at) || entry.fetched_at >= content.fetched_at)
        {
            return Ok(());
        }

        if let Some(parent) = path.parent()
            && fs::create_dir_all(parent).await.is_err()
        {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        let entry = CacheEntry {
            url: normalized.clone(),
            text: content.text.clone(),
            fetched_at: content.fetched_at,
        };

        let serialized = match serde_json::to_string_pretty(&entry) {
            Ok(serialized) => serialized,
            Err(_) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };

        let tmp_path = path.with_extension("json.tmp");
        if fs::write(&tmp_path, serialized).await.is_err()
            || fs::rename(&tmp_path, &path).await.is_err()
        {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// 获取统计快照
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            writes: self.stats.writes.load(Ordering::Relaxed),
            errors: self.stats.errors.load(Ordering::Relaxed),
        }
    }
}
