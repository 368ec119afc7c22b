use crate::error::{Result, TeaDoctorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const API_URL_ENV: &str = "TEA_DOCTOR_API_URL";
const WEATHER_KEY_ENV: &str = "TEA_DOCTOR_WEATHER_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 検出サービスのベースURL
    pub api_base_url: String,
    pub weather_api_host: String,
    pub weather_api_key: Option<String>,
    pub timeout_seconds: u64,
    /// 一時的な失敗に対する再試行回数（0で無効）
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8091".into(),
            weather_api_host: "weatherapi-com.p.rapidapi.com".into(),
            weather_api_key: None,
            timeout_seconds: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイル + 環境変数
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::read_from(path)?.with_env_overrides())
    }

    /// ファイルのみ（保存前の編集用。環境変数の値を書き込まない）
    pub fn read_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            log::debug!("config not found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TeaDoctorError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("tea-doctor").join("config.json"))
    }

    /// 環境変数を優先
    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(key) = std::env::var(WEATHER_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather_api_key = Some(key);
            }
        }
        self
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TeaDoctorError::MissingApiKey)
    }

    pub fn set_api_base_url(&mut self, url: String) -> Result<()> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(TeaDoctorError::Config(format!(
                "API URL must start with http:// or https://: {}",
                url
            )));
        }
        self.api_base_url = trimmed.to_string();
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    pub fn retry_policy(&self) -> crate::api::RetryPolicy {
        crate::api::RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_credentials() {
        let config = Config::default();
        assert!(config.weather_api_key.is_none());
        assert!(matches!(
            config.weather_api_key(),
            Err(TeaDoctorError::MissingApiKey)
        ));
    }

    #[test]
    fn test_set_api_base_url_validates_scheme() {
        let mut config = Config::default();
        assert!(config.set_api_base_url("ftp://host".into()).is_err());
        config.set_api_base_url("https://api.example.com/".into()).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_seconds": 5}"#).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.weather_api_host, "weatherapi-com.p.rapidapi.com");
    }

    #[test]
    fn test_timeout_never_zero() {
        let config = Config {
            timeout_seconds: 0,
            ..Config::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
