#[cfg(test)]
mod tests {
    use crate::cli::{Args, Command};
    use crate::config::LLMProvider;
    use clap::Parser;

    #[test]
    fn test_args_generate_mode() {
        let args = Args::try_parse_from(["blogforge-rs", "--topic", "Rust async"]).unwrap();

        assert_eq!(args.topic, Some("Rust async".to_string()));
        assert!(!args.serve);
        assert!(!args.verbose);
        assert!(!args.no_cache);
    }

    #[test]
    fn test_args_topic_required_without_serve() {
        assert!(Args::try_parse_from(["blogforge-rs"]).is_err());
        assert!(Args::try_parse_from(["blogforge-rs", "--serve"]).is_ok());
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from(["blogforge-rs", "-t", "Rust async", "-v"]).unwrap();

        assert_eq!(args.topic, Some("Rust async".to_string()));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_llm_options() {
        let args = Args::try_parse_from([
            "blogforge-rs",
            "--topic",
            "Rust async",
            "--llm-provider",
            "deepseek",
            "--llm-api-key",
            "test-key",
            "--model-efficient",
            "model-a",
            "--model-powerful",
            "model-b",
            "--max-tokens",
            "8192",
            "--temperature",
            "0.3",
        ])
        .unwrap();

        let (config, command) = args.into_config();
        assert_eq!(
            command,
            Command::Generate {
                topic: "Rust async".to_string()
            }
        );
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.api_key, "test-key");
        assert_eq!(config.llm.model_efficient, "model-a");
        assert_eq!(config.llm.model_powerful, "model-b");
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.llm.temperature, 0.3);
    }

    #[test]
    fn test_args_pipeline_overrides() {
        let args = Args::try_parse_from([
            "blogforge-rs",
            "--topic",
            "Rust async",
            "--target-count",
            "8",
            "--min-sources",
            "3",
            "--max-parallels",
            "2",
            "--no-cache",
        ])
        .unwrap();

        let (config, _) = args.into_config();
        assert_eq!(config.gather.target_count, 8);
        assert_eq!(config.research.min_sources, 3);
        assert_eq!(config.extract.max_parallels, 2);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_args_serve_mode_with_overrides() {
        let args = Args::try_parse_from([
            "blogforge-rs",
            "--serve",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
        ])
        .unwrap();

        let (config, command) = args.into_config();
        assert_eq!(command, Command::Serve);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_unknown_provider_keeps_default() {
        let args = Args::try_parse_from([
            "blogforge-rs",
            "--topic",
            "Rust async",
            "--llm-provider",
            "not-a-provider",
        ])
        .unwrap();

        let (config, _) = args.into_config();
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
    }
}
