use clap::Parser;
use event_feed_etl::core::{ConfigProvider, Storage};
use event_feed_etl::utils::error::ErrorSeverity;
use event_feed_etl::utils::{logger, validation::Validate};
use event_feed_etl::{
    CliConfig, EtlEngine, EtlError, FeedConfig, FeedPipeline, HttpFetcher, LocalStorage,
    StdoutStorage,
};

async fn run_export<S: Storage>(storage: S, config: FeedConfig) -> Result<String, EtlError> {
    let fetcher = HttpFetcher::new()
        .with_timeout(config.request_timeout())
        .with_headers(config.request_headers());
    let pipeline = FeedPipeline::new(storage, config, fetcher);

    EtlEngine::new(pipeline).run().await
}

fn report_failure(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Feed export failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting event-feed-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => report_failure(&e),
    };

    let result = match config.output_path().map(str::to_string) {
        Some(output_path) => run_export(LocalStorage::new(output_path), config).await,
        None => run_export(StdoutStorage, config).await,
    };

    match result {
        Ok(location) => tracing::info!("✅ Export completed: {}", location),
        Err(e) => report_failure(&e),
    }
}
