use crate::error::{AlchemistError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENDPOINT_ENV: &str = "DATA_ALCHEMIST_QUERY_URL";
pub const API_KEY_ENV: &str = "DATA_ALCHEMIST_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 自然言語クエリサービスのURL
    pub query_endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    /// 出力先の拡張子がない場合の形式 (csv/xlsx)
    pub default_export_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_endpoint: "http://localhost:3000/api/query".into(),
            api_key: None,
            timeout_seconds: 60,
            default_export_format: "csv".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AlchemistError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("data-alchemist").join("config.json"))
    }

    /// クエリサービスのURL（環境変数を優先）
    pub fn endpoint(&self) -> Result<String> {
        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }

        if self.query_endpoint.trim().is_empty() {
            return Err(AlchemistError::MissingEndpoint);
        }
        Ok(self.query_endpoint.clone())
    }

    /// APIキー（環境変数を優先）
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        self.query_endpoint = url;
        self.save()
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.query_endpoint, "http://localhost:3000/api/query");
        assert_eq!(config.timeout_seconds, 60);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_seconds": 5}"#).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.default_export_format, "csv");
        assert_eq!(config.query_endpoint, Config::default().query_endpoint);
    }

    #[test]
    fn test_blank_endpoint_is_missing() {
        let config = Config {
            query_endpoint: "  ".into(),
            ..Default::default()
        };
        if std::env::var(ENDPOINT_ENV).is_err() {
            assert!(matches!(config.endpoint(), Err(AlchemistError::MissingEndpoint)));
        }
    }
}
