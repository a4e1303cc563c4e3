use crate::core::extract::parse_feed;
use crate::core::{
    ConfigProvider, ExportResult, Extraction, FeedFetcher, Pipeline, SourceOutcome, Storage,
    Table,
};
use crate::domain::model::FieldPath;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub struct FeedPipeline<S: Storage, C: ConfigProvider, F: FeedFetcher> {
    storage: S,
    config: C,
    fetcher: F,
}

impl<S: Storage, C: ConfigProvider, F: FeedFetcher> FeedPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }

    /// 讀取單一來源；失敗只影響該來源
    async fn read_source(&self, url: &str) -> SourceOutcome {
        let result = match self.fetcher.fetch(url).await {
            Ok(body) => parse_feed(&body, self.config.callback_name(), self.config.records_key()),
            Err(e) => Err(e),
        };

        match result {
            Ok(records) => {
                tracing::info!("📡 {}: collected {} records", url, records.len());
                SourceOutcome::Collected {
                    source: url.to_string(),
                    records,
                }
            }
            Err(reason) => {
                tracing::warn!("🔶 Skipping source {}: {}", url, reason);
                SourceOutcome::Failed {
                    source: url.to_string(),
                    reason,
                }
            }
        }
    }

    fn build_metadata(&self, result: &ExportResult) -> Result<String> {
        let mut metadata = HashMap::new();
        metadata.insert("source_count", serde_json::json!(result.source_count));
        metadata.insert("failed_sources", serde_json::json!(result.failed_sources));
        metadata.insert("record_count", serde_json::json!(result.records.len()));
        metadata.insert("columns", serde_json::json!(result.table.header));
        metadata.insert(
            "timestamp",
            serde_json::json!(chrono::Utc::now().to_rfc3339()),
        );
        Ok(serde_json::to_string_pretty(&metadata)?)
    }

    fn build_archive(&self, files: &[(String, Vec<u8>)], metadata: &str) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (name, data) in files {
            zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            zip.write_all(data)?;
        }

        zip.start_file::<_, ()>("metadata.json", FileOptions::default())?;
        zip.write_all(metadata.as_bytes())?;

        // 完成並取回底層 Vec<u8>
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: FeedFetcher> Pipeline for FeedPipeline<S, C, F> {
    async fn extract(&self) -> Result<Extraction> {
        let mut outcomes = Vec::with_capacity(self.config.source_urls().len());

        // 依序讀取，每個來源等待完成後才處理下一個
        for url in self.config.source_urls() {
            outcomes.push(self.read_source(url).await);
        }

        Ok(Extraction::from_outcomes(outcomes))
    }

    async fn transform(&self, extraction: Extraction) -> Result<ExportResult> {
        let paths: Vec<FieldPath> = self
            .config
            .columns()
            .iter()
            .map(|column| FieldPath::parse(column))
            .collect();

        let table = Table::project(&extraction.records, &paths);
        let csv_output = table.to_delimited();

        tracing::debug!(
            "🔄 Projected {} records onto {} columns",
            table.rows.len(),
            paths.len()
        );

        Ok(ExportResult {
            records: extraction.records,
            table,
            csv_output,
            failed_sources: extraction
                .failures
                .into_iter()
                .map(|failure| failure.source)
                .collect(),
            source_count: extraction.source_count,
        })
    }

    async fn load(&self, result: ExportResult) -> Result<String> {
        let base_name = self.config.output_filename();
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        // 根據配置的輸出格式產生檔案
        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => files.push((
                    format!("{}.csv", base_name),
                    result.csv_output.clone().into_bytes(),
                )),
                "json" => files.push((
                    format!("{}.json", base_name),
                    serde_json::to_string_pretty(&result.records)?.into_bytes(),
                )),
                other => {
                    tracing::warn!("🔶 Unsupported output format: {}", other);
                }
            }
        }

        if let Some(archive_name) = self.config.archive_name() {
            let archive_name = archive_name.replace(
                "{timestamp}",
                &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            );
            let metadata = self.build_metadata(&result)?;
            let zip_data = self.build_archive(&files, &metadata)?;

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_name, &zip_data).await?;
            return Ok(self.storage.location(&archive_name));
        }

        let mut locations = Vec::with_capacity(files.len());
        for (name, data) in &files {
            self.storage.write_file(name, data).await?;
            locations.push(self.storage.location(name));
        }

        Ok(locations.join(", "))
    }
}
