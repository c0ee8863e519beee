//! 信息源搜集阶段 - 面向主题发起搜索，去重并排序候选信息源

use std::collections::HashSet;
use std::time::Duration;

use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::types::SourceCandidate;
use crate::utils::terms::overlap_ratio;

pub mod provider;

pub use provider::{DuckDuckGoProvider, SearchHit, SearchProvider};

/// 执行搜集阶段
///
/// 依次发起直接查询与可选的时效性变体查询，按规范化URL去重后以
/// 启发式打分排序，保留前`target_count`个候选。所有查询都失败或
/// 全部为空时返回`NoSourcesFound`，显式上浮而不是伪装成空结果的成功。
pub async fn execute(
    context: &PipelineContext,
    topic: &str,
) -> Result<Vec<SourceCandidate>, PipelineError> {
    let config = &context.config.gather;

    let mut queries = vec![topic.to_string()];
    if config.include_news_variant {
        queries.push(format!("{} latest news", topic));
    }

    let mut candidates: Vec<SourceCandidate> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for query in &queries {
        let search = context.searcher.search(query, config.results_per_query);
        let hits = match tokio::time::timeout(
            Duration::from_secs(config.search_timeout_seconds),
            search,
        )
        .await
        {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                eprintln!("⚠️ 查询“{}”失败: {}", query, e);
                continue;
            }
            Err(_) => {
                eprintln!("⚠️ 查询“{}”超时", query);
                continue;
            }
        };

        for (rank, hit) in hits.into_iter().enumerate() {
            let candidate = SourceCandidate {
                url: hit.url,
                title: hit.title,
                rank,
                query: query.clone(),
            };
            // 单次运行内按规范化URL去重，先到先得
            if seen.insert(candidate.normalized_url()) {
                candidates.push(candidate);
            }
        }
    }

    if candidates.is_empty() {
        return Err(PipelineError::NoSourcesFound);
    }

    let ranked = rank_candidates(topic, candidates, config.target_count);
    println!("🔍 搜集到 {} 个候选信息源", ranked.len());
    Ok(ranked)
}

/// 按启发式分数降序排列并截取前`target_count`个
///
/// 分数 = 搜索位次分量 + 标题与主题的检索词重合度。搜索引擎未提供
/// 时间戳，时效性由“latest news”变体查询间接体现。
fn rank_candidates(
    topic: &str,
    mut candidates: Vec<SourceCandidate>,
    target_count: usize,
) -> Vec<SourceCandidate> {
    candidates.sort_by(|a, b| {
        candidate_score(topic, b)
            .partial_cmp(&candidate_score(topic, a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(target_count);
    candidates
}

fn candidate_score(topic: &str, candidate: &SourceCandidate) -> f64 {
    let position_score = 1.0 / (1.0 + candidate.rank as f64);
    position_score + overlap_ratio(topic, &candidate.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, title: &str, rank: usize) -> SourceCandidate {
        SourceCandidate {
            url: url.to_string(),
            title: title.to_string(),
            rank,
            query: "rust async".to_string(),
        }
    }

    #[test]
    fn test_rank_prefers_relevant_titles() {
        let candidates = vec![
            candidate("https://a.com/1", "Cooking recipes", 0),
            candidate("https://b.com/2", "Rust async in depth", 1),
        ];

        let ranked = rank_candidates("rust async", candidates, 5);
        assert_eq!(ranked[0].url, "https://b.com/2");
    }

    #[test]
    fn test_rank_prefers_earlier_position_on_equal_overlap() {
        let candidates = vec![
            candidate("https://a.com/1", "Rust async guide", 0),
            candidate("https://b.com/2", "Rust async guide", 3),
        ];

        let ranked = rank_candidates("rust async", candidates, 5);
        assert_eq!(ranked[0].url, "https://a.com/1");
    }

    #[test]
    fn test_rank_truncates_to_target_count() {
        let candidates = (0..10)
            .map(|i| candidate(&format!("https://a.com/{}", i), "Rust", i))
            .collect();

        let ranked = rank_candidates("rust", candidates, 3);
        assert_eq!(ranked.len(), 3);
    }
}
