use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 单条引用 - 将文中论断关联到某个信息源
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct Citation {
    /// 被支撑的论断原文片段
    pub claim: String,
    /// 支撑该论断的信息源URL，必须出自研究素材包
    pub source_url: String,
}

/// 模型返回的结构化文章草稿，经校验后转为最终文章
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ArticleDraft {
    /// Markdown格式的文章正文，含标题与分节
    pub body: String,
    /// 按出现顺序排列的引用列表
    pub citations: Vec<Citation>,
}

/// 最终文章 - 流水线的终态产物，返回后不再修改
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Article {
    /// Markdown格式的文章正文
    pub body: String,
    /// 按出现顺序排列的引用列表
    pub citations: Vec<Citation>,
}

impl Article {
    /// 渲染为带内联引用清单的Markdown文本
    pub fn render_markdown(&self) -> String {
        if self.citations.is_empty() {
            return self.body.clone();
        }

        let mut output = self.body.clone();
        output.push_str("\n\n## Sources\n");
        for (i, citation) in self.citations.iter().enumerate() {
            output.push_str(&format!("{}. <{}>\n", i + 1, citation.source_url));
        }
        output
    }
}

impl From<ArticleDraft> for Article {
    fn from(draft: ArticleDraft) -> Self {
        Self {
            body: draft.body,
            citations: draft.citations,
        }
    }
}
