//! Configuration system for docmap
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/docmap/config.{DOCMAP_ENV}.json
//! 3. Default values
//!
//! Where DOCMAP_ENV can be: production (default), development, test
//!
//! # Examples
//!
//! ## Loading Configuration
//!
//! ```no_run
//! use docmap::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load with default priority
//! let config = AppConfig::load(None)?;
//! println!("k = {}, seed = {}", config.clustering.clusters, config.clustering.seed);
//!
//! // Load from specific file
//! let config = AppConfig::load(Some("./my-config.json".as_ref()))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Creating Configuration
//!
//! ```
//! use docmap::config::{AppConfig, ClassifierProvider};
//!
//! let mut config = AppConfig::default();
//! config.clustering.clusters = 5;
//! config.classifier.provider = ClassifierProvider::Ollama;
//!
//! // Validate before using
//! config.validate().unwrap();
//! ```
//!
//! ## Environment Variables
//!
//! Environment variables override config file values:
//! - DOCMAP_CLUSTERS
//! - DOCMAP_SEED
//! - DOCMAP_COMPONENTS
//! - DOCMAP_OLLAMA_URL
//! - DOCMAP_CLASSIFIER_MODEL

use crate::cluster::KMeansParams;
use crate::pipeline::PipelineConfig;
use crate::reduce::ReducerOptions;
use crate::vectorize::VectorizerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Supported zero-shot classifier backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierProvider {
    #[default]
    Lexical,
    Ollama,
}

impl std::fmt::Display for ClassifierProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for ClassifierProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::ValidationError(format!(
                "Unknown classifier: {}",
                s
            ))),
        }
    }
}

/// Configuration for the zero-shot classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Backend type
    #[serde(default)]
    pub provider: ClassifierProvider,

    /// Ollama base URL
    #[serde(default = "default_ollama_url")]
    pub url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default)]
    pub temperature: f32,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen3:8b".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ClassifierProvider::Lexical,
            url: default_ollama_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            temperature: 0.0,
        }
    }
}

impl ClassifierConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "classifier timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.provider == ClassifierProvider::Ollama {
            if self.url.is_empty() {
                return Err(ConfigError::ValidationError(
                    "URL cannot be empty".to_string(),
                ));
            }
            if self.model.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Model name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Tokenization and TF-IDF weighting
    #[serde(default)]
    pub vectorizer: VectorizerOptions,

    /// K-means settings (k, seed, iteration cap, initialization)
    #[serde(default)]
    pub clustering: KMeansParams,

    /// PCA settings
    #[serde(default)]
    pub projection: ReducerOptions,

    /// Zero-shot classifier used to name clusters
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides()?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/docmap/config.{DOCMAP_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            } else {
                return Err(ConfigError::ValidationError(format!(
                    "Config file not found: {:?}",
                    path
                )));
            }
        }

        let env = std::env::var("DOCMAP_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = Self::config_dir() {
            let config_path = config_dir.join(format!("config.{}.json", env));

            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::debug!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(k) = std::env::var("DOCMAP_CLUSTERS") {
            self.clustering.clusters = parse_env("DOCMAP_CLUSTERS", &k)?;
        }

        if let Ok(seed) = std::env::var("DOCMAP_SEED") {
            self.clustering.seed = parse_env("DOCMAP_SEED", &seed)?;
        }

        if let Ok(components) = std::env::var("DOCMAP_COMPONENTS") {
            self.projection.components = parse_env("DOCMAP_COMPONENTS", &components)?;
        }

        if let Ok(url) = std::env::var("DOCMAP_OLLAMA_URL") {
            self.classifier.url = url;
        }

        if let Ok(model) = std::env::var("DOCMAP_CLASSIFIER_MODEL") {
            self.classifier.model = model;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clustering.clusters == 0 {
            return Err(ConfigError::ValidationError(
                "clusters must be greater than 0".to_string(),
            ));
        }

        if self.clustering.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.projection.components == 0 {
            return Err(ConfigError::ValidationError(
                "components must be greater than 0".to_string(),
            ));
        }

        self.classifier.validate()
    }

    /// Settings the pipeline needs
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            vectorizer: self.vectorizer.clone(),
            clustering: self.clustering.clone(),
            projection: self.projection.clone(),
        }
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("docmap"))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::ValidationError(format!("{} has an invalid value: {}", name, value))
    })
}
