use serde::{Deserialize, Serialize};

use crate::types::source::SourceCandidate;

/// 研究素材包中的单个条目
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResearchEntry {
    /// 对应的候选信息源
    pub candidate: SourceCandidate,
    /// 限长摘录，作为写作阶段的提示词素材
    pub excerpt: String,
    /// 相关性分数，越大越相关
    pub score: f64,
}

/// 研究素材包 - 聚合阶段的产物，按相关性降序排列
///
/// 不变式：每个条目的摘录均非空；提取失败的信息源在聚合时被丢弃，
/// 不会以空条目形式保留。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResearchBundle {
    /// 本次运行的主题
    pub topic: String,
    /// 按分数降序排列的素材条目
    pub entries: Vec<ResearchEntry>,
}

impl ResearchBundle {
    /// 素材包中包含的所有规范化URL
    pub fn normalized_urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.candidate.normalized_url())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
