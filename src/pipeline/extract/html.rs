//! HTML正文提取 - 按选择器优先级剥离模板噪声

use scraper::{ElementRef, Html, Selector};

/// 判定“找到了实质内容”的最小长度
const SUBSTANTIAL_CONTENT_CHARS: usize = 200;

/// 正文容器的候选选择器，按可信度排列
const CONTENT_SELECTORS: [&str; 10] = [
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".story-body",
    ".article__body",
    "#article-body",
    "#content",
];

/// 从HTML中提取主要正文
///
/// 依次尝试常见的正文容器选择器，取首个内容量达标的元素；全部
/// 落空时回退到整个body。结果做空白归一并截断到`max_chars`。
pub fn extract_main_content(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str)
            && let Some(element) = document.select(&selector).next()
        {
            let cleaned = clean_text(&element_text(&element));
            if cleaned.len() > SUBSTANTIAL_CONTENT_CHARS {
                return truncate_at_word(&cleaned, max_chars);
            }
        }
    }

    // 兜底：取body全文
    if let Ok(selector) = Selector::parse("body")
        && let Some(body) = document.select(&selector).next()
    {
        return truncate_at_word(&clean_text(&element_text(&body)), max_chars);
    }

    String::new()
}

/// 提取页面标题
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// 空白归一：折叠连续空白为单个空格
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 在词边界处截断到`max_chars`个字符
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => cut[..pos].to_string(),
        _ => cut,
    }
}
