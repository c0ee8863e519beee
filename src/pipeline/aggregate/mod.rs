//! 素材聚合阶段 - 合并候选与提取结果，产出排序后的研究素材包

use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::types::{ExtractedContent, ExtractionFailure, ResearchBundle, ResearchEntry, SourceCandidate};
use crate::utils::excerpt::build_excerpt;
use crate::utils::terms::overlap_ratio;

/// 执行聚合阶段
///
/// 候选与提取结果按位置一一对应。提取失败的信息源直接丢弃，存活者
/// 计算限长摘录与相关性分数后降序排列。存活数低于`min_sources`时
/// 返回`InsufficientResearch`；区分“信息源不可用”与“流水线损坏”
/// 是该阶段的职责。
pub fn execute(
    context: &PipelineContext,
    topic: &str,
    candidates: &[SourceCandidate],
    outcomes: Vec<Result<ExtractedContent, ExtractionFailure>>,
) -> Result<ResearchBundle, PipelineError> {
    let config = &context.config.research;

    let mut entries: Vec<ResearchEntry> = Vec::new();
    for (candidate, outcome) in candidates.iter().zip(outcomes) {
        let content = match outcome {
            Ok(content) => content,
            Err(failure) => {
                if context.config.verbose {
                    println!("   ⚠️ 丢弃不可用信息源 {}: {}", failure.url, failure.reason);
                }
                continue;
            }
        };

        let excerpt = build_excerpt(
            &content.text,
            config.excerpt_max_sentences,
            config.excerpt_max_chars,
        );
        // 不变式：素材包中不保留空摘录条目
        if excerpt.is_empty() {
            continue;
        }

        let score = relevance_score(topic, candidate, &excerpt);
        entries.push(ResearchEntry {
            candidate: candidate.clone(),
            excerpt,
            score,
        });
    }

    if entries.len() < config.min_sources {
        return Err(PipelineError::InsufficientResearch {
            found: entries.len(),
            required: config.min_sources,
        });
    }

    // 降序排列；sort_by是稳定排序，同分时保留搜索位次顺序
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!("🧩 素材聚合完成: {} 个可用信息源", entries.len());

    Ok(ResearchBundle {
        topic: topic.to_string(),
        entries,
    })
}

/// 相关性分数：搜索位次分量 + 摘录与主题的检索词重合度
fn relevance_score(topic: &str, candidate: &SourceCandidate, excerpt: &str) -> f64 {
    let position_score = 1.0 / (1.0 + candidate.rank as f64);
    let text = format!("{} {}", candidate.title, excerpt);
    position_score + overlap_ratio(topic, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::PipelineContext;
    use crate::pipeline::error::ExtractError;
    use chrono::Utc;

    fn candidate(url: &str, rank: usize) -> SourceCandidate {
        SourceCandidate {
            url: url.to_string(),
            title: "Rust async overview".to_string(),
            rank,
            query: "rust async".to_string(),
        }
    }

    fn ok_content(url: &str, text: &str) -> Result<ExtractedContent, ExtractionFailure> {
        Ok(ExtractedContent {
            url: url.to_string(),
            text: text.to_string(),
            fetched_at: Utc::now(),
            from_cache: false,
        })
    }

    fn failed(url: &str) -> Result<ExtractedContent, ExtractionFailure> {
        Err(ExtractionFailure {
            url: url.to_string(),
            reason: ExtractError::EmptyContent,
        })
    }

    fn test_context() -> PipelineContext {
        PipelineContext::for_tests()
    }

    #[test]
    fn test_failed_extractions_are_dropped() {
        let context = test_context();
        let candidates = vec![
            candidate("https://a.com/1", 0),
            candidate("https://b.com/2", 1),
            candidate("https://c.com/3", 2),
        ];
        let outcomes = vec![
            ok_content("https://a.com/1", "Rust async text one."),
            failed("https://b.com/2"),
            ok_content("https://c.com/3", "Rust async text two."),
        ];

        let bundle = execute(&context, "rust async", &candidates, outcomes).unwrap();
        assert_eq!(bundle.len(), 2);
        assert!(bundle.entries.iter().all(|e| !e.excerpt.is_empty()));
    }

    #[test]
    fn test_below_threshold_is_insufficient_research() {
        let context = test_context();
        let candidates = vec![
            candidate("https://a.com/1", 0),
            candidate("https://b.com/2", 1),
        ];
        let outcomes = vec![
            ok_content("https://a.com/1", "Rust async text."),
            failed("https://b.com/2"),
        ];

        // min_sources默认值为2，只剩1个存活
        let result = execute(&context, "rust async", &candidates, outcomes);
        assert!(matches!(
            result,
            Err(PipelineError::InsufficientResearch {
                found: 1,
                required: 2
            })
        ));
    }

    #[test]
    fn test_exactly_threshold_proceeds() {
        let context = test_context();
        let candidates = vec![
            candidate("https://a.com/1", 0),
            candidate("https://b.com/2", 1),
        ];
        let outcomes = vec![
            ok_content("https://a.com/1", "Rust async text."),
            ok_content("https://b.com/2", "More rust async text."),
        ];

        let bundle = execute(&context, "rust async", &candidates, outcomes).unwrap();
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_entries_ordered_by_descending_score() {
        let context = test_context();
        let candidates = vec![
            candidate("https://a.com/1", 4),
            candidate("https://b.com/2", 0),
            candidate("https://c.com/3", 2),
        ];
        let outcomes = vec![
            ok_content("https://a.com/1", "Rust async content."),
            ok_content("https://b.com/2", "Rust async content."),
            ok_content("https://c.com/3", "Rust async content."),
        ];

        let bundle = execute(&context, "rust async", &candidates, outcomes).unwrap();
        let scores: Vec<f64> = bundle.entries.iter().map(|e| e.score).collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(bundle.entries[0].candidate.url, "https://b.com/2");
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let context = test_context();
        let candidates = vec![
            candidate("https://a.com/1", 0),
            candidate("https://b.com/2", 1),
            candidate("https://c.com/3", 2),
        ];
        let outcomes = vec![
            ok_content("https://a.com/1", "   "),
            ok_content("https://b.com/2", "Rust async text."),
            ok_content("https://c.com/3", "Rust async text."),
        ];

        let bundle = execute(&context, "rust async", &candidates, outcomes).unwrap();
        assert_eq!(bundle.len(), 2);
    }
}
