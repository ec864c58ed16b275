use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HF_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
const DEFAULT_LOCAL_SUMMARY_SENTENCES: usize = 3;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Summary server.
#[derive(Clone, Debug)]
pub struct Config {
    /// Port the HTTP server binds on `0.0.0.0`.
    pub server_port: u16,
    /// Backend used to turn text into summaries.
    pub summarizer_backend: SummarizerBackend,
    /// Bearer credential for the hosted inference API.
    pub hf_api_token: Option<String>,
    /// Hosted summarization model identifier.
    pub hf_model: String,
    /// Base URL of the hosted inference API (the model id is appended).
    pub hf_api_url: String,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Ollama model used to generate summaries.
    pub ollama_model: String,
    /// Number of sentences kept by the in-process extractive pipeline.
    pub local_summary_sentences: usize,
    /// Directory where uploaded documents are staged while they are processed.
    pub upload_dir: String,
    /// Maximum accepted request body size for document uploads.
    pub max_upload_bytes: usize,
    /// Optional timeout applied to outbound summarization requests.
    pub request_timeout: Option<Duration>,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummarizerBackend {
    /// Hosted Hugging Face inference API.
    HuggingFace,
    /// Local Ollama runtime reached over HTTP.
    Ollama,
    /// In-process extractive pipeline.
    Local,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`. Every setting has a default; blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        Ok(Self {
            server_port: vars.parse_or("PORT", DEFAULT_PORT)?,
            summarizer_backend: vars
                .get("SUMMARIZER_BACKEND")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("SUMMARIZER_BACKEND".into()))
                })
                .transpose()?
                .unwrap_or(SummarizerBackend::HuggingFace),
            hf_api_token: vars.get("HF_API_TOKEN"),
            hf_model: vars.string_or("HF_MODEL", DEFAULT_HF_MODEL),
            hf_api_url: vars.string_or("HF_API_URL", DEFAULT_HF_API_URL),
            ollama_url: vars.string_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            ollama_model: vars.string_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            local_summary_sentences: vars
                .parse_or("LOCAL_SUMMARY_SENTENCES", DEFAULT_LOCAL_SUMMARY_SENTENCES)?,
            upload_dir: vars.string_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
            max_upload_bytes: vars.parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            request_timeout: vars
                .get("REQUEST_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map(Duration::from_secs)
                        .map_err(|_| ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".into()))
                })
                .transpose()?,
        })
    }

    /// Ensure the selected backend has everything it needs to run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.local_summary_sentences == 0 {
            return Err(ConfigError::InvalidValue("LOCAL_SUMMARY_SENTENCES".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue("MAX_UPLOAD_BYTES".into()));
        }
        Ok(())
    }

    /// Emit the effective settings. The API token is reported only as present or absent.
    pub fn log_summary(&self) {
        tracing::info!(
            server_port = self.server_port,
            backend = ?self.summarizer_backend,
            hf_model = %self.hf_model,
            hf_token_present = self.hf_api_token.is_some(),
            upload_dir = %self.upload_dir,
            max_upload_bytes = self.max_upload_bytes,
            request_timeout = ?self.request_timeout,
            "Loaded configuration"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            summarizer_backend: SummarizerBackend::HuggingFace,
            hf_api_token: None,
            hf_model: DEFAULT_HF_MODEL.into(),
            hf_api_url: DEFAULT_HF_API_URL.into(),
            ollama_url: DEFAULT_OLLAMA_URL.into(),
            ollama_model: DEFAULT_OLLAMA_MODEL.into(),
            local_summary_sentences: DEFAULT_LOCAL_SUMMARY_SENTENCES,
            upload_dir: DEFAULT_UPLOAD_DIR.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: None,
        }
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string())),
            None => Ok(default),
        }
    }
}

impl std::str::FromStr for SummarizerBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" | "remote" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            "local" => Ok(Self::Local),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load `.env` and the environment, then install the result in the global cache.
///
/// Runs before tracing is installed so `.env` can set `RUST_LOG`; call
/// [`Config::log_summary`] once a subscriber exists.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    config.validate().expect("Invalid configuration");
    CONFIG.set(config).expect("Failed to set config");
}
