//! Configuration management for the credit decision pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming scoring requests
    pub request_subject: String,
    /// Subject for outgoing credit decisions
    pub decision_subject: String,
}

/// Classifier model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// ONNX export of the production model
    pub model_path: String,
    /// Local copy tried when the primary model fails to load
    #[serde(default)]
    pub fallback_model_path: Option<String>,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Maximum requests scored concurrently
    pub workers: usize,
    /// Seconds between metrics summaries
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,
}

fn default_report_interval() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "credit.scoring.requests".to_string(),
                decision_subject: "credit.scoring.decisions".to_string(),
            },
            model: ModelConfig {
                model_path: "models/debito_automatico.onnx".to_string(),
                fallback_model_path: None,
                onnx_threads: 1,
            },
            pipeline: PipelineConfig {
                workers: 4,
                report_interval_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.pipeline.workers, 4);
        assert!(config.model.fallback_model_path.is_none());
    }

    #[test]
    fn test_parse_with_defaults_ignores_threshold_section() {
        let toml = r#"
            [nats]
            url = "nats://nats:4222"
            request_subject = "req"
            decision_subject = "dec"

            [model]
            model_path = "models/primary.onnx"
            fallback_model_path = "./fraud_model.onnx"

            [pipeline]
            workers = 8

            [logging]
            level = "debug"
            format = "pretty"

            [decision]
            threshold = 0.9
        "#;

        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(
            config.model.fallback_model_path.as_deref(),
            Some("./fraud_model.onnx")
        );
        assert_eq!(config.pipeline.report_interval_secs, 30);
        assert_eq!(config.pipeline.workers, 8);
    }
}
