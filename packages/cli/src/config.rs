use js2ts_inference::{InferenceOptions, ReturnAnnotations};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "js2ts.config.json";

/// js2ts configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Output directory for generated .ts files
    pub out_dir: String,

    /// Emit minimal whitespace
    pub compact: bool,

    /// Re-parse every emitted file and fail on syntax errors
    pub verify: bool,

    pub synthesize_interfaces: bool,

    pub return_annotations: ReturnAnnotations,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the output directory
    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions {
            synthesize_interfaces: self.synthesize_interfaces,
            return_annotations: self.return_annotations,
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: "dist".to_string(),
            compact: false,
            verify: true,
            synthesize_interfaces: true,
            return_annotations: ReturnAnnotations::Full,
        }
    }
}
