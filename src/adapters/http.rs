use crate::domain::ports::FeedFetcher;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Reads a feed with a single GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_headers(mut self, headers: Option<&HashMap<String, String>>) -> Self {
        if let Some(headers) = headers {
            self.headers = headers.clone();
        }
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);

        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("📡 Requesting feed: {}", url);
        let response = request.send().await?;
        tracing::debug!("📡 {} responded with {}", url, response.status());

        if !response.status().is_success() {
            return Err(EtlError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
