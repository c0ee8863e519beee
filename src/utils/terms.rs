use std::collections::HashSet;

/// 过短的词不参与重合度计算
const MIN_TERM_LEN: usize = 3;

/// 将文本切分为小写检索词集合
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= MIN_TERM_LEN)
        .map(|term| term.to_string())
        .collect()
}

/// 主题检索词与目标文本的重合比例，范围[0, 1]
pub fn overlap_ratio(topic: &str, text: &str) -> f64 {
    let topic_terms = tokenize(topic);
    if topic_terms.is_empty() {
        return 0.0;
    }

    let text_terms = tokenize(text);
    let matched = topic_terms
        .iter()
        .filter(|term| text_terms.contains(*term))
        .count();
    matched as f64 / topic_terms.len() as f64
}
