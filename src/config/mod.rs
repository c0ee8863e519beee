use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// 信息源搜集配置
    pub gather: GatherConfig,

    /// 正文提取配置
    pub extract: ExtractConfig,

    /// 素材聚合配置
    pub research: ResearchConfig,

    /// 写作配置
    pub writer: WriterConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 抓取缓存配置
    pub cache: CacheConfig,

    /// HTTP服务配置
    pub server: ServerConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 信息源搜集配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GatherConfig {
    /// 最终保留的候选信息源数量
    pub target_count: usize,

    /// 单条查询向搜索引擎请求的结果数
    pub results_per_query: usize,

    /// 是否追加“latest news”变体查询以偏向时效性内容
    pub include_news_variant: bool,

    /// 单条查询的超时时间（秒）
    pub search_timeout_seconds: u64,
}

/// 正文提取配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExtractConfig {
    /// 并发抓取的工作上限
    pub max_parallels: usize,

    /// 单页抓取的超时时间（秒）
    pub fetch_timeout_seconds: u64,

    /// 提取阶段整体超时时间（秒）
    pub total_timeout_seconds: u64,

    /// 单个URL失败后的重试间隔（毫秒），最多重试一次
    pub retry_delay_ms: u64,

    /// 提取正文的长度上限（字符）
    pub max_content_chars: usize,

    /// 低于该长度的提取结果视为无正文（字符）
    pub min_content_chars: usize,
}

/// 素材聚合配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 进入写作阶段所需的最少可用信息源数
    pub min_sources: usize,

    /// 摘录最多保留的句子数
    pub excerpt_max_sentences: usize,

    /// 摘录的硬性字符上限
    pub excerpt_max_chars: usize,
}

/// 写作配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WriterConfig {
    /// 文章正文的最小长度（字符）
    pub min_body_chars: usize,

    /// 正文至少包含的Markdown分节数
    pub min_sections: usize,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，用于文章撰写，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 抓取缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,

    /// 监听端口
    pub port: u16,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            target_count: 5,
            results_per_query: 10,
            include_news_variant: true,
            search_timeout_seconds: 15,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_parallels: 4,
            fetch_timeout_seconds: 15,
            total_timeout_seconds: 90,
            retry_delay_ms: 800,
            max_content_chars: 20000,
            min_content_chars: 200,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            min_sources: 2,
            excerpt_max_sentences: 8,
            excerpt_max_chars: 1200,
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            min_body_chars: 1500,
            min_sections: 3,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("BLOGFORGE_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model_efficient: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            model_powerful: String::from("Qwen/Qwen3-235B-A22B-Instruct-2507"),
            max_tokens: 32768,
            temperature: 0.6,
            retry_attempts: 3,
            retry_delay_ms: 3000,
            timeout_seconds: 180,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".blogforge/cache"),
            expire_hours: 24,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 5000,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
