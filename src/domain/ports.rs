use crate::domain::model::{ExportResult, Extraction};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where a file written under `path` ends up, for reporting.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn source_urls(&self) -> &[String];
    fn callback_name(&self) -> &str;
    fn records_key(&self) -> &str;
    fn columns(&self) -> &[String];
    fn request_timeout(&self) -> Option<Duration>;
    fn request_headers(&self) -> Option<&HashMap<String, String>>;
    fn output_path(&self) -> Option<&str>;
    fn output_formats(&self) -> &[String];
    fn output_filename(&self) -> &str;
    /// Archive name when compression is enabled.
    fn archive_name(&self) -> Option<&str>;
}

/// Transport used to read one feed as raw text.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, extraction: Extraction) -> Result<ExportResult>;
    async fn load(&self, result: ExportResult) -> Result<String>;
}

