pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::{CompressionConfig, FeedConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "event-feed-etl")]
#[command(about = "Export JSONP event feeds as a single CSV table")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long = "source", value_delimiter = ',', help = "Feed URL, in output order")]
    pub sources: Vec<String>,

    #[arg(long = "column", value_delimiter = ',', help = "Field path such as lineup/0")]
    pub columns: Vec<String>,

    #[arg(long, help = "JSONP callback name [default: widgetCallback]")]
    pub callback: Option<String>,

    #[arg(long, help = "Member holding the records [default: events]")]
    pub records_key: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Directory for output files; stdout when omitted")]
    pub output_path: Option<String>,

    #[arg(long = "output-format", value_delimiter = ',', help = "csv, json")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Bundle outputs into a ZIP archive")]
    pub compress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<FeedConfig> {
        let mut config = match &self.config {
            Some(path) => FeedConfig::from_file(path)?,
            None => FeedConfig::new(Vec::new(), Vec::new()),
        };

        if !self.sources.is_empty() {
            config.source.urls = self.sources.clone();
        }
        if !self.columns.is_empty() {
            config.export.columns = self.columns.clone();
        }
        if let Some(callback) = &self.callback {
            config.source.callback = callback.clone();
        }
        if let Some(records_key) = &self.records_key {
            config.source.records_key = records_key.clone();
        }
        if self.timeout_seconds.is_some() {
            config.source.timeout_seconds = self.timeout_seconds;
        }
        if self.output_path.is_some() {
            config.load.output_path = self.output_path.clone();
        }
        if !self.output_formats.is_empty() {
            config.load.output_formats = self.output_formats.clone();
        }
        if self.compress {
            let filename = config
                .load
                .compression
                .take()
                .map(|c| c.filename)
                .unwrap_or_else(toml_config::default_archive_name);
            config.load.compression = Some(CompressionConfig {
                enabled: true,
                filename,
            });
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::utils::validation::Validate;

    #[test]
    fn test_resolve_from_flags_only() {
        let cli = CliConfig::parse_from([
            "event-feed-etl",
            "--source",
            "https://widgets.example.com/a,https://widgets.example.com/b",
            "--column",
            "id,title",
            "--column",
            "lineup/0",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.source_urls().len(), 2);
        assert_eq!(config.columns(), &["id", "title", "lineup/0"]);
        assert_eq!(config.callback_name(), "widgetCallback");
        assert_eq!(config.output_path(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("feeds.toml");
        std::fs::write(
            &path,
            r#"
[source]
urls = ["https://widgets.example.com/from-file"]
callback = "fileCallback"

[export]
columns = ["id"]

[load]
output_path = "./from-file"
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "event-feed-etl",
            "--config",
            path.to_str().unwrap(),
            "--output-path",
            "./from-flag",
            "--compress",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.source_urls(), &["https://widgets.example.com/from-file"]);
        assert_eq!(config.callback_name(), "fileCallback");
        assert_eq!(config.output_path(), Some("./from-flag"));
        assert_eq!(config.archive_name(), Some("events_{timestamp}.zip"));
    }

    #[test]
    fn test_missing_sources_fail_validation() {
        let cli = CliConfig::parse_from(["event-feed-etl", "--column", "id"]);
        assert!(cli.resolve().unwrap().validate().is_err());
    }
}
