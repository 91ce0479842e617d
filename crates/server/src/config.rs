//! # Application Configuration
//!
//! Defines the configuration structure for `ragsite-server` and the
//! logic for loading it from an optional `config.yml` plus environment
//! variables. File values may reference environment variables with
//! `${VAR}` placeholders; nested keys can also be overridden directly
//! via `RAGSITE_`-prefixed variables (e.g. `RAGSITE_EMBEDDING__API_URL`).

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The embedding model endpoint; one fixed model per deployment.
    pub embedding: EmbeddingConfig,
    /// The chat-completion endpoint used for grounded answers.
    pub chat: ChatConfig,
    /// The hosted knowledge store (documents, content, user roles).
    pub store: StoreConfig,
    /// The external identity service that validates bearer tokens.
    pub identity: IdentityConfig,
    /// Ingestion defaults, overridable per request.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Similarity-search defaults, overridable per request.
    #[serde(default)]
    pub search: SearchConfig,
    /// Optional sink for captured leads. When absent, leads are logged
    /// and acknowledged without being forwarded.
    #[serde(default)]
    pub leads: Option<LeadsConfig>,
}

fn default_port() -> u16 {
    9090
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
}

/// Configuration for the chat-completion provider.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
    /// Deployment-level override of the default grounding prompt.
    /// Must contain a `{context}` placeholder.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Configuration for the knowledge store.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub api_url: String,
    pub service_role_key: String,
}

/// Configuration for the identity service.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: String,
}

/// Default chunking parameters for ingestion.
#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_source")]
    pub default_source: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            default_source: default_source(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_source() -> String {
    "manual_ingest".to_string()
}

/// Default similarity-search parameters. These are product-tuning
/// constants carried over from the deployed defaults; callers can
/// override them per request.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_match_count")]
    pub match_count: u32,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_count: default_match_count(),
            min_similarity: default_min_similarity(),
        }
    }
}

fn default_match_count() -> u32 {
    6
}
fn default_min_similarity() -> f64 {
    0.15
}

/// Configuration for the lead-capture sink.
#[derive(Debug, Deserialize, Clone)]
pub struct LeadsConfig {
    pub webhook_url: String,
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// Layering, lowest priority first: optional `config.yml` (with `${VAR}`
/// substitution), then plain environment variables for top-level keys
/// like `PORT`, then `RAGSITE_`-prefixed variables for nested keys.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let config_path = config_path_override
        .map(String::from)
        .unwrap_or_else(|| format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")));

    if let Some(content) = read_and_substitute(&config_path)? {
        info!("Loading configuration from '{config_path}'.");
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("RAGSITE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
