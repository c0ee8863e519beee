#[cfg(test)]
mod tests {
    use crate::config::{CacheConfig, Config, LLMConfig, LLMProvider};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.gather.target_count, 5);
        assert_eq!(config.gather.results_per_query, 10);
        assert!(config.gather.include_news_variant);
        assert_eq!(config.extract.max_parallels, 4);
        assert_eq!(config.extract.min_content_chars, 200);
        assert_eq!(config.research.min_sources, 2);
        assert_eq!(config.research.excerpt_max_sentences, 8);
        assert_eq!(config.research.excerpt_max_chars, 1200);
        assert_eq!(config.writer.min_body_chars, 1500);
        assert_eq!(config.writer.min_sections, 3);
        assert_eq!(config.server.port, 5000);
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_provider_default() {
        let provider = LLMProvider::default();
        assert_eq!(provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "ollama".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::DeepSeek.to_string(), "deepseek");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::OpenAI);
        // api_key may be empty if env var is not set
        assert!(!config.api_base_url.is_empty());
        assert!(!config.model_efficient.is_empty());
        assert!(!config.model_powerful.is_empty());
        assert_eq!(config.max_tokens, 32768);
        assert_eq!(config.temperature, 0.6);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay_ms, 3000);
        assert_eq!(config.timeout_seconds, 180);
    }

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();

        assert!(config.enabled);
        assert_eq!(config.cache_dir, PathBuf::from(".blogforge/cache"));
        assert_eq!(config.expire_hours, 24); // 1 day
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("blogforge.toml");

        let config_content = r#"verbose = true

[gather]
target_count = 8

[research]
min_sources = 3

[cache]
enabled = false
expire_hours = 48
"#;

        std::fs::write(&config_path, config_content).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.gather.target_count, 8);
        assert_eq!(config.research.min_sources, 3);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.expire_hours, 48);
        // 未出现的段落保持默认值
        assert_eq!(config.writer.min_sections, 3);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/blogforge.toml"));
        assert!(result.is_err());
    }
}
