use anyhow::{bail, Context, Result};

/// Which OpenAI-compatible backend serves AI-assisted content, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Ollama,
    Disabled,
}

impl LlmProvider {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "ollama" => Ok(LlmProvider::Ollama),
            "" | "disabled" | "none" | "off" => Ok(LlmProvider::Disabled),
            other => bail!("LLM_PROVIDER must be one of openai, ollama, disabled (got '{other}')"),
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434/v1",
            LlmProvider::OpenAi | LlmProvider::Disabled => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Ollama => "llama3.1",
            LlmProvider::OpenAi | LlmProvider::Disabled => "gpt-4o-mini",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub llm: LlmConfig,
    pub keyword_top_n: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            llm: llm_from_env()?,
            keyword_top_n: std::env::var("KEYWORD_TOP_N")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<usize>()
                .context("KEYWORD_TOP_N must be a non-negative integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn llm_from_env() -> Result<LlmConfig> {
    let provider = LlmProvider::parse(&std::env::var("LLM_PROVIDER").unwrap_or_default())?;
    let api_key = std::env::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty());

    if provider == LlmProvider::OpenAi && api_key.is_none() {
        bail!("LLM_API_KEY is required when LLM_PROVIDER=openai");
    }

    Ok(LlmConfig {
        provider,
        base_url: std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| provider.default_base_url().to_string()),
        api_key,
        model: std::env::var("LLM_MODEL").unwrap_or_else(|_| provider.default_model().to_string()),
    })
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
