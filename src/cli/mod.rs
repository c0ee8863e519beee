use crate::config::{Config, LLMProvider};
use clap::Parser;
use std::path::PathBuf;

/// BlogForge-RS - 由Rust与AI驱动的博客文章生成引擎
#[derive(Parser, Debug)]
#[command(name = "blogforge-rs")]
#[command(
    about = "AI-powered blog post generation engine. It researches a topic on the web, extracts and caches source content, and composes a professional, fully-cited blog post."
)]
#[command(author = "Sopaco")]
#[command(version)]
pub struct Args {
    /// 要生成文章的主题；serve模式下可省略
    #[arg(short, long, required_unless_present = "serve")]
    pub topic: Option<String>,

    /// 以HTTP服务方式常驻运行
    #[arg(long)]
    pub serve: bool,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP服务监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP服务监听端口
    #[arg(long)]
    pub port: Option<u16>,

    /// 最终保留的候选信息源数量
    #[arg(long)]
    pub target_count: Option<usize>,

    /// 进入写作阶段所需的最少可用信息源数
    #[arg(long)]
    pub min_sources: Option<usize>,

    /// 并发抓取的工作上限
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// LLM Provider (openai, deepseek, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 高能效模型，优先用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于文章撰写以及efficient失效时的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 是否禁用抓取缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

/// 解析后的运行方式
#[derive(Debug, PartialEq)]
pub enum Command {
    /// 一次性生成指定主题的文章
    Generate { topic: String },
    /// 常驻HTTP服务
    Serve,
}

impl Args {
    /// 将CLI参数转换为配置与运行方式
    pub fn into_config(self) -> (Config, Command) {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("blogforge.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 覆盖流水线配置
        if let Some(target_count) = self.target_count {
            config.gather.target_count = target_count;
        }
        if let Some(min_sources) = self.min_sources {
            config.research.min_sources = min_sources;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.extract.max_parallels = max_parallels;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖服务配置
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        // 缓存配置
        if self.no_cache {
            config.cache.enabled = false;
        }

        // 其他配置
        config.verbose = self.verbose;

        let command = if self.serve {
            Command::Serve
        } else {
            // required_unless_present保证非serve模式下topic必有值
            Command::Generate {
                topic: self.topic.unwrap_or_default(),
            }
        };

        (config, command)
    }
}

// Include tests
#[cfg(test)]
mod tests;
