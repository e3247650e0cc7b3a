use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::app::infrastructure::error::AppError;

pub const API_KEY_ENV: &str = "SALVAGE_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Usually left empty in the file and supplied through `SALVAGE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Upper bound for one translation request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_source_language")]
    pub source_language: String,

    #[serde(default = "default_target_language")]
    pub target_language: String,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default = "default_target_extension")]
    pub target_extension: String,

    /// Where registry, buffer and identity live. Defaults to data_dir/salvage.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Where saved files are exported. Defaults to <data_dir>/exports.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_source_language() -> String {
    "C".to_string()
}

fn default_target_language() -> String {
    "Rust".to_string()
}

fn default_source_extension() -> String {
    "c".to_string()
}

fn default_target_extension() -> String {
    "rs".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        let mut settings = match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                let default = Self::default();
                // Try to save defaults for next time
                if let Err(e) = default.save() {
                    tracing::debug!("Could not write default settings: {}", e);
                }
                default
            }
        };
        settings.apply_env();
        settings
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::get_config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("salvage");
        path.push("settings.json");
        path
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("salvage");
            path
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("exports"))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.source_extension.trim().is_empty() || self.target_extension.trim().is_empty() {
            return Err(AppError::Settings("file extensions must not be empty".to_string()));
        }
        if self.source_extension == self.target_extension {
            return Err(AppError::Settings(
                "source and target extensions must differ".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Settings(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(AppError::Settings("max_output_tokens must be positive".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Settings("request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
