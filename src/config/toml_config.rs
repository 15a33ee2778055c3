use crate::core::ConfigProvider;
use crate::domain::model::TariffCatalog;
use crate::utils::error::{LessonGenError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub tariffs: TariffCatalog,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LessonGenError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LESSON_GEN_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LessonGenError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 600)?;
        }

        for name in self.tariffs.names() {
            validate_non_empty_string("tariffs", name)?;
        }

        Ok(())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().map(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn api_token(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為沒有 token
        self.api
            .token
            .as_deref()
            .filter(|t| !t.is_empty() && !t.starts_with("${"))
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QuotaBucket;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_config_with_tariffs() {
        let toml_content = r#"
[api]
base_url = "https://api.example.com"
timeout_seconds = 30

[tariffs.basic]
images = 5
generations = 20

[tariffs.pro]
images = 50
generations = 200
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_base_url(), "https://api.example.com");
        assert_eq!(config.timeout_seconds(), 30);
        assert_eq!(config.tariffs.len(), 2);
        let pro = config.tariffs.get("pro").unwrap();
        assert_eq!(pro.limit_for(QuotaBucket::Generations), 200);
        assert!(!config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LESSON_GEN_TEST_TOKEN", "secret-token");

        let toml_content = r#"
[api]
base_url = "https://api.example.com"
token = "${LESSON_GEN_TEST_TOKEN}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_token(), Some("secret-token"));

        std::env::remove_var("LESSON_GEN_TEST_TOKEN");
    }

    #[test]
    fn test_unresolved_token_is_ignored() {
        let toml_content = r#"
[api]
base_url = "https://api.example.com"
token = "${LESSON_GEN_TOKEN_NOT_SET_ANYWHERE}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_token(), None);
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert!(config.tariffs.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[api]
base_url = "invalid-url"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[api]
base_url = "https://api.example.com"
timeout_seconds = 0
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[api]
base_url = "https://api.example.com/v2"

[logging]
json = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_base_url(), "https://api.example.com/v2");
        assert!(config.json_logging());
    }
}
