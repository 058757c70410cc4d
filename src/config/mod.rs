use std::env;
use std::time::Duration;
use anyhow::Result;
use tracing::{info, warn};

pub const DEFAULT_CONVERTER_URL: &str = "http://localhost:3000";
pub const DEFAULT_OUTPUT_FILENAME: &str = "combined.pdf";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub converter_url: String,
    pub serve_files: bool,
    pub static_dir: String,
    pub max_files: usize,
    pub max_upload_mb: usize,
    pub converter_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    pub conversion_concurrency: usize,
    pub output_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            converter_url: DEFAULT_CONVERTER_URL.to_string(),
            serve_files: false,
            static_dir: "static".to_string(),
            max_files: 1000,
            max_upload_mb: 50,
            converter_timeout_seconds: 10,
            request_timeout_seconds: 120,
            max_concurrent_requests: 100,
            conversion_concurrency: 4,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let defaults = Config::default();

        // PORT wins over SERVER_PORT for platform compatibility
        let server_port = match env::var("PORT") {
            Ok(_) => Self::parse_env_var("PORT", defaults.server_port),
            Err(_) => Self::parse_env_var("SERVER_PORT", defaults.server_port),
        };

        let config = Config {
            server_host: Self::string_env_var("SERVER_HOST", &defaults.server_host),
            server_port,
            converter_url: Self::string_env_var("CONVERTER_URL", &defaults.converter_url)
                .trim_end_matches('/')
                .to_string(),
            serve_files: Self::bool_env_var("SERVE_FILES", defaults.serve_files),
            static_dir: Self::string_env_var("STATIC_DIR", &defaults.static_dir),
            max_files: Self::parse_env_var("MAX_FILES", defaults.max_files),
            max_upload_mb: Self::parse_env_var("MAX_UPLOAD_MB", defaults.max_upload_mb),
            converter_timeout_seconds: Self::parse_env_var(
                "CONVERTER_TIMEOUT_SECONDS",
                defaults.converter_timeout_seconds,
            ),
            request_timeout_seconds: Self::parse_env_var(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            max_concurrent_requests: Self::parse_env_var(
                "MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            ),
            conversion_concurrency: Self::parse_env_var(
                "CONVERSION_CONCURRENCY",
                defaults.conversion_concurrency,
            ),
            output_filename: Self::string_env_var("OUTPUT_FILENAME", &defaults.output_filename),
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        match env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => {
                info!("{} not set, using default: {}", var_name, default);
                default.to_string()
            }
        }
    }

    fn bool_env_var(var_name: &str, default: bool) -> bool {
        match env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => parse_flag(&val),
            _ => {
                info!("{} not set, using default: {}", var_name, default);
                default
            }
        }
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    default
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                default
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.converter_url.is_empty() {
            return Err(anyhow::anyhow!("CONVERTER_URL must not be empty"));
        }
        if !self.converter_url.starts_with("http://") && !self.converter_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "CONVERTER_URL must be an http(s) URL, got {}",
                self.converter_url
            ));
        }
        if self.max_files == 0 {
            return Err(anyhow::anyhow!("MAX_FILES must be greater than 0"));
        }
        if self.max_upload_mb == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_MB must be greater than 0"));
        }
        if self.converter_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("CONVERTER_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_REQUESTS must be greater than 0"));
        }
        if self.conversion_concurrency == 0 {
            return Err(anyhow::anyhow!("CONVERSION_CONCURRENCY must be greater than 0"));
        }
        if self.output_filename.is_empty() {
            return Err(anyhow::anyhow!("OUTPUT_FILENAME must not be empty"));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn converter_timeout(&self) -> Duration {
        Duration::from_secs(self.converter_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Truthy values: anything starting with `t` or `y`, or `1`.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    value == "1" || value.starts_with('t') || value.starts_with('y')
}
