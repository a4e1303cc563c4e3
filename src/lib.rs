pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::HttpFetcher;
pub use config::cli::{LocalStorage, StdoutStorage};
pub use config::toml_config::FeedConfig;
pub use core::{
    etl::EtlEngine, extract::parse_feed, jsonp::unwrap_jsonp, pipeline::FeedPipeline,
    projection::export_table,
};
pub use utils::error::{EtlError, Result};
