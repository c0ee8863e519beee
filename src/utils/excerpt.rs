use regex::Regex;
use std::sync::OnceLock;

/// 句子边界：句末标点后跟空白
fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"(?:[.!?。！？])\s+").expect("invalid sentence regex"))
}

/// 从正文中构建限长摘录
///
/// 优先取开头的`max_sentences`个句子，再施加`max_chars`的硬上限，
/// 截断时回退到最近的词边界。
pub fn build_excerpt(text: &str, max_sentences: usize, max_chars: usize) -> String {
    let text = text.trim();
    if text.is_empty() || max_sentences == 0 || max_chars == 0 {
        return String::new();
    }

    let mut taken = String::new();
    let mut count = 0;
    let mut last_end = 0;

    for boundary in sentence_boundary().find_iter(text) {
        count += 1;
        last_end = boundary.end();
        if count >= max_sentences {
            break;
        }
    }

    if count >= max_sentences {
        taken.push_str(text[..last_end].trim_end());
    } else {
        // 句子数不足上限，整段进入字符截断
        taken.push_str(text);
    }

    truncate_at_word_boundary(&taken, max_chars)
}

/// 按词边界截断到`max_chars`个字符
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => format!("{}…", cut[..pos].trim_end()),
        _ => format!("{}…", cut),
    }
}
