use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::clipboard::PasteMethod;

const APP_DIR: &str = "quillbar";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub rephrase: RephraseConfig,
    #[serde(default)]
    pub paste: PasteConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "hf.co/bartowski/SmolLM2-360M-Instruct-GGUF:Q5_K_S".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature; the model's own default when unset.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens; unbounded when unset.
    #[serde(default)]
    pub num_predict: Option<i32>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
            num_predict: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 400,
            height: 340,
            min_width: 400,
            min_height: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BufferConfig {
    pub max_chars: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig { max_chars: 2000 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Request a continuation every time space is pressed.
    pub auto: bool,
    /// Minimum buffered characters before an automatic request is made.
    pub min_chars: usize,
    /// Number of candidate continuations requested per flush.
    pub count: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            auto: true,
            min_chars: 1,
            count: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RephraseConfig {
    /// Open the rephrase panel whenever the selection changes.
    pub watch_selection: bool,
    pub poll_ms: u64,
}

impl Default for RephraseConfig {
    fn default() -> Self {
        RephraseConfig {
            watch_selection: false,
            poll_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PasteConfig {
    pub method: PasteMethod,
    /// Put the previous clipboard content back after pasting.
    pub restore_clipboard: bool,
    /// Time given to the target window to regain focus before pasting.
    pub focus_delay_ms: u64,
}

impl Default for PasteConfig {
    fn default() -> Self {
        PasteConfig {
            method: PasteMethod::Clipboard,
            restore_clipboard: false,
            focus_delay_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the config directory. A missing file yields
    /// the defaults; an unreadable or malformed one is an error.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing {}", config_path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        self.suggestions.count = self.suggestions.count.clamp(1, 5);
        self.buffer.max_chars = self.buffer.max_chars.max(1);
        self.rephrase.poll_ms = self.rephrase.poll_ms.max(100);
        self.window.width = self.window.width.max(self.window.min_width);
        self.window.height = self.window.height.max(self.window.min_height);
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_config_dir() -> PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config").join(APP_DIR)
        } else {
            PathBuf::from(".")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ollama.host, "http://localhost:11434");
        assert_eq!(config.buffer.max_chars, 2000);
        assert!(config.suggestions.auto);
        assert_eq!(config.suggestions.count, 1);
        assert_eq!(config.paste.method, PasteMethod::Clipboard);
        assert!(!config.rephrase.watch_selection);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.ollama.model, default_model());
        assert_eq!(config.window.width, 400);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [ollama]
            model = "llama3.2"
            temperature = 0.4

            [buffer]
            max_chars = 500

            [paste]
            method = "type"
            "#,
        )
        .unwrap();

        assert_eq!(config.ollama.model, "llama3.2");
        assert_eq!(config.ollama.host, "http://localhost:11434");
        assert_eq!(config.ollama.temperature, Some(0.4));
        assert_eq!(config.buffer.max_chars, 500);
        assert_eq!(config.paste.method, PasteMethod::Type);
        assert_eq!(config.paste.focus_delay_ms, 150);
    }

    #[test]
    fn test_normalize_clamps_values() {
        let config = Config::parse(
            r#"
            [suggestions]
            count = 40

            [buffer]
            max_chars = 0

            [window]
            width = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.suggestions.count, 5);
        assert_eq!(config.buffer.max_chars, 1);
        assert_eq!(config.window.width, 400);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Config::parse("[ollama\nhost = ").is_err());
        assert!(Config::parse("[paste]\nmethod = \"carrier-pigeon\"").is_err());
    }
}
