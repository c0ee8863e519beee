use url::Url;

/// 常见跟踪参数前缀与参数名，规范化时剔除
const TRACKING_PREFIXES: [&str; 2] = ["utm_", "mc_"];
const TRACKING_PARAMS: [&str; 7] = [
    "fbclid", "gclid", "msclkid", "igshid", "ref", "ref_src", "spm",
];

/// 将URL规范化为稳定的缓存/去重键
///
/// 规则：保留scheme+host+path，剔除跟踪参数后保留其余query，
/// 丢弃fragment，去掉路径末尾的斜杠。无法解析的输入按小写原样返回，
/// 保证同一字符串始终映射到同一个键。
pub fn normalize_url(raw: &str) -> String {
    let parsed = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(_) => return raw.trim().to_lowercase(),
    };

    let host = match parsed.host_str() {
        Some(host) => host.to_lowercase(),
        None => return raw.trim().to_lowercase(),
    };

    let mut normalized = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        normalized.push_str(&format!(":{}", port));
    }

    let path = parsed.path().trim_end_matches('/');
    normalized.push_str(path);

    let kept_query: Vec<String> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| {
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect();

    if !kept_query.is_empty() {
        normalized.push('?');
        normalized.push_str(&kept_query.join("&"));
    }

    normalized
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    TRACKING_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
        || TRACKING_PARAMS.iter().any(|param| key == *param)
}
