use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
    // API server
    pub port: u16,

    // Grammar backend (LanguageTool-protocol server)
    pub grammar_server_url: String,
    pub grammar_server_port: u16,
    pub grammar_server_jar: Option<String>,
    pub java_bin: String,

    // Translation backend
    pub translation_server_url: String,
    pub translation_model_path: Option<String>,

    // Correction backend
    pub correction_server_url: String,
    pub correction_model_dir: String,
    pub disable_onednn_opts: bool,

    // External call behavior
    pub backend_timeout_secs: u64,

    // Startup readiness probe
    pub startup_probe_attempts: u32,
    pub startup_probe_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let grammar_server_port: u16 = std::env::var("GRAMMAR_SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8001);

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            // Grammar backend - URL defaults to the local spawn target
            grammar_server_url: std::env::var("GRAMMAR_SERVER_URL")
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", grammar_server_port)),
            grammar_server_port,
            grammar_server_jar: std::env::var("GRAMMAR_SERVER_JAR").ok(),
            java_bin: std::env::var("JAVA_BIN").unwrap_or_else(|_| "java".to_string()),

            // Translation backend
            translation_server_url: std::env::var("TRANSLATION_SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            translation_model_path: std::env::var("TRANSLATION_MODEL_PATH").ok(),

            // Correction backend
            correction_server_url: std::env::var("CORRECTION_SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8002".to_string()),
            correction_model_dir: std::env::var("CORRECTION_MODEL_DIR")
                .unwrap_or_else(|_| "models/macbert4csc-base-chinese".to_string()),
            disable_onednn_opts: std::env::var("DISABLE_ONEDNN_OPTS")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),

            backend_timeout_secs: std::env::var("BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            startup_probe_attempts: std::env::var("STARTUP_PROBE_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            startup_probe_delay_ms: std::env::var("STARTUP_PROBE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: &[&str] = &[
        "PORT",
        "GRAMMAR_SERVER_URL",
        "GRAMMAR_SERVER_PORT",
        "GRAMMAR_SERVER_JAR",
        "JAVA_BIN",
        "TRANSLATION_SERVER_URL",
        "TRANSLATION_MODEL_PATH",
        "CORRECTION_SERVER_URL",
        "CORRECTION_MODEL_DIR",
        "DISABLE_ONEDNN_OPTS",
        "BACKEND_TIMEOUT_SECS",
        "STARTUP_PROBE_ATTEMPTS",
        "STARTUP_PROBE_DELAY_MS",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_env_is_empty() {
        clear_env();
        let config = Config::from_env().expect("Should load");

        assert_eq!(config.port, 8000);
        assert_eq!(config.grammar_server_port, 8001);
        assert_eq!(config.grammar_server_url, "http://127.0.0.1:8001");
        assert!(config.grammar_server_jar.is_none());
        assert_eq!(config.java_bin, "java");
        assert_eq!(config.translation_server_url, "http://127.0.0.1:5000");
        assert!(config.translation_model_path.is_none());
        assert_eq!(config.correction_server_url, "http://127.0.0.1:8002");
        assert_eq!(
            config.correction_model_dir,
            "models/macbert4csc-base-chinese"
        );
        assert!(config.disable_onednn_opts);
        assert_eq!(config.backend_timeout_secs, 30);
        assert_eq!(config.startup_probe_attempts, 10);
        assert_eq!(config.startup_probe_delay_ms, 500);
    }

    #[test]
    #[serial]
    fn test_grammar_url_follows_custom_port() {
        clear_env();
        std::env::set_var("GRAMMAR_SERVER_PORT", "9100");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.grammar_server_port, 9100);
        assert_eq!(config.grammar_server_url, "http://127.0.0.1:9100");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_explicit_grammar_url_wins_over_port() {
        clear_env();
        std::env::set_var("GRAMMAR_SERVER_PORT", "9100");
        std::env::set_var("GRAMMAR_SERVER_URL", "http://grammar.internal:8500");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.grammar_server_url, "http://grammar.internal:8500");
        assert_eq!(config.grammar_server_port, 9100);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_disable_onednn_opts_parsing() {
        clear_env();

        std::env::set_var("DISABLE_ONEDNN_OPTS", "0");
        assert!(!Config::from_env().unwrap().disable_onednn_opts);

        std::env::set_var("DISABLE_ONEDNN_OPTS", "false");
        assert!(!Config::from_env().unwrap().disable_onednn_opts);

        std::env::set_var("DISABLE_ONEDNN_OPTS", "1");
        assert!(Config::from_env().unwrap().disable_onednn_opts);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numeric_values_fall_back_to_defaults() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("BACKEND_TIMEOUT_SECS", "soon");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.port, 8000);
        assert_eq!(config.backend_timeout_secs, 30);

        clear_env();
    }
}
