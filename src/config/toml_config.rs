use crate::core::extract::DEFAULT_RECORDS_KEY;
use crate::core::jsonp::DEFAULT_CALLBACK;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub source: SourceConfig,
    pub export: ExportSection,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub urls: Vec<String>,
    #[serde(default = "default_callback")]
    pub callback: String,
    #[serde(default = "default_records_key")]
    pub records_key: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// 欄位路徑，順序即輸出欄位順序
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: Option<String>,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    #[serde(default = "default_filename")]
    pub filename: String,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(default = "default_archive_name")]
    pub filename: String,
}

fn default_callback() -> String {
    DEFAULT_CALLBACK.to_string()
}

fn default_records_key() -> String {
    DEFAULT_RECORDS_KEY.to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

fn default_filename() -> String {
    "events".to_string()
}

pub(crate) fn default_archive_name() -> String {
    "events_{timestamp}.zip".to_string()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            output_formats: default_output_formats(),
            filename: default_filename(),
            compression: None,
        }
    }
}

impl FeedConfig {
    pub fn new(urls: Vec<String>, columns: Vec<String>) -> Self {
        Self {
            source: SourceConfig {
                urls,
                callback: default_callback(),
                records_key: default_records_key(),
                timeout_seconds: None,
                headers: None,
            },
            export: ExportSection { columns },
            load: LoadConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WIDGET_KEY})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn compression_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl Validate for FeedConfig {
    fn validate(&self) -> Result<()> {
        if self.source.urls.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "source.urls".to_string(),
            });
        }
        for url in &self.source.urls {
            validation::validate_url("source.urls", url)?;
        }

        validation::validate_non_empty_string("source.callback", &self.source.callback)?;
        validation::validate_non_empty_string("source.records_key", &self.source.records_key)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        if self.export.columns.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "export.columns".to_string(),
            });
        }
        for column in &self.export.columns {
            validation::validate_column("export.columns", column)?;
        }

        for format in &self.load.output_formats {
            if !SUPPORTED_FORMATS.contains(&format.as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        SUPPORTED_FORMATS.join(", ")
                    ),
                });
            }
        }

        validation::validate_non_empty_string("load.filename", &self.load.filename)?;

        match &self.load.output_path {
            Some(path) => validation::validate_path("load.output_path", path)?,
            None => {
                // stdout 只能輸出表格本身
                let needs_files = self.compression_enabled()
                    || self.load.output_formats.iter().any(|f| f != "csv");
                if needs_files {
                    return Err(EtlError::MissingConfigError {
                        field: "load.output_path".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl ConfigProvider for FeedConfig {
    fn source_urls(&self) -> &[String] {
        &self.source.urls
    }

    fn callback_name(&self) -> &str {
        &self.source.callback
    }

    fn records_key(&self) -> &str {
        &self.source.records_key
    }

    fn columns(&self) -> &[String] {
        &self.export.columns
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn request_headers(&self) -> Option<&HashMap<String, String>> {
        self.source.headers.as_ref()
    }

    fn output_path(&self) -> Option<&str> {
        self.load.output_path.as_deref()
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn output_filename(&self) -> &str {
        &self.load.filename
    }

    fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[source]
urls = [
    "https://widgets.example.com/feed/venue-1",
    "https://widgets.example.com/feed/venue-2",
]
timeout_seconds = 15

[source.headers]
"X-Widget-Key" = "${EVENT_FEED_TEST_KEY}"

[export]
columns = ["id", "title", "lineup/0", "venue/name"]

[load]
output_path = "./output"
output_formats = ["csv", "json"]

[load.compression]
enabled = true
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = FeedConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.source.urls.len(), 2);
        assert_eq!(config.callback_name(), "widgetCallback");
        assert_eq!(config.records_key(), "events");
        assert_eq!(config.columns()[2], "lineup/0");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.output_filename(), "events");
        assert_eq!(config.archive_name(), Some("events_{timestamp}.zip"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_placeholders_are_substituted() {
        std::env::set_var("EVENT_FEED_TEST_KEY", "secret-123");
        let config = FeedConfig::from_toml_str(SAMPLE).unwrap();
        let headers = config.request_headers().unwrap();
        assert_eq!(headers.get("X-Widget-Key").unwrap(), "secret-123");
    }

    #[test]
    fn test_unknown_placeholder_is_left_untouched() {
        let content = SAMPLE.replace("EVENT_FEED_TEST_KEY", "EVENT_FEED_SURELY_UNSET_VAR");
        let config = FeedConfig::from_toml_str(&content).unwrap();
        let headers = config.request_headers().unwrap();
        assert_eq!(
            headers.get("X-Widget-Key").unwrap(),
            "${EVENT_FEED_SURELY_UNSET_VAR}"
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = FeedConfig::from_toml_str(
            r#"
[source]
urls = ["https://widgets.example.com/feed"]

[export]
columns = ["id"]
"#,
        )
        .unwrap();

        assert_eq!(config.output_path(), None);
        assert_eq!(config.output_formats(), &["csv".to_string()]);
        assert_eq!(config.archive_name(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = FeedConfig::from_toml_str("[source\nurls = 1").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_settings() {
        let base = FeedConfig::new(
            vec!["https://widgets.example.com/feed".to_string()],
            vec!["id".to_string()],
        );
        assert!(base.validate().is_ok());

        let mut no_sources = base.clone();
        no_sources.source.urls.clear();
        assert!(matches!(
            no_sources.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));

        let mut no_columns = base.clone();
        no_columns.export.columns.clear();
        assert!(no_columns.validate().is_err());

        let mut bad_url = base.clone();
        bad_url.source.urls.push("ftp://widgets.example.com".to_string());
        assert!(bad_url.validate().is_err());

        let mut bad_format = base.clone();
        bad_format.load.output_path = Some("./out".to_string());
        bad_format.load.output_formats = vec!["xlsx".to_string()];
        assert!(bad_format.validate().is_err());

        let mut json_to_stdout = base.clone();
        json_to_stdout.load.output_formats = vec!["json".to_string()];
        assert!(matches!(
            json_to_stdout.validate(),
            Err(EtlError::MissingConfigError { ref field }) if field == "load.output_path"
        ));

        let mut zero_timeout = base;
        zero_timeout.source.timeout_seconds = Some(0);
        assert!(zero_timeout.validate().is_err());
    }
}
