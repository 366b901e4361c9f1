/// Application configuration module
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub nasa_api_key: String,
    pub apod_api_url: String,
    pub library_url: String,
    pub gemini: GeminiConfig,
    pub http_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env_or("DATABASE_URL", "sqlite://cosmospin.db?mode=rwc");
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:3000");

        let nasa_api_key = env_or("NASA_API_KEY", "DEMO_KEY");
        let apod_api_url = env_or("APOD_API_URL", "https://api.nasa.gov/planetary/apod");
        let library_url = env_or("NASA_LIBRARY_URL", "https://images-api.nasa.gov/search");

        let gemini = GeminiConfig {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            api_url: env_or(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com/v1beta/models",
            ),
            model: env_or("GEMINI_MODEL", "gemini-3-flash-preview"),
        };

        let http_timeout = Duration::from_secs(env_u64("HTTP_TIMEOUT_SECONDS", 30));

        Ok(Self {
            database_url,
            bind_addr,
            nasa_api_key,
            apod_api_url,
            library_url,
            gemini,
            http_timeout,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
