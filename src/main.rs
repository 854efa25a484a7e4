// src/main.rs

// Modules defined in the crate
mod config;
mod delivery;
mod error;
mod notify;
mod pipeline;
mod tracker;
mod types;

use crate::config::AppConfig;
use crate::delivery::DeliveryHttpClient;
use crate::error::AppError;
use crate::notify::NotificationService;
use crate::tracker::PackageTracker;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("track2slack.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Executes one run: fetch deliveries, resolve statuses, complete the
/// delivered ones, post the summary.
async fn execute_run(config: &AppConfig) -> Result<(), AppError> {
    let source = DeliveryHttpClient::connect(&config.api).await?;

    let tracker = PackageTracker::new(&config.tracker)?.on_tracked(|event| {
        log::info!("Tracked {} -> {}", event.tracking_code, event.status);
    });

    let notifier = NotificationService::new(
        config.webhook_url.clone(),
        config.tracker.url_template.clone(),
    )?;

    let summary = pipeline::execute(&source, &tracker, &notifier).await?;

    log::debug!("Slack message:\n{}", summary.notification.message);
    log::debug!("Webhook body: {}", summary.notification.response.body);
    log::info!(
        "Run finished: {} in transit, {} completed, webhook answered {}",
        summary.in_transit,
        summary.completed,
        summary.notification.response.status
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging(config::verbose_from_env())?;

    let config = AppConfig::resolve()?;

    if let Err(err) = execute_run(&config).await {
        log::error!("Run aborted: {}", err);
        return Err(err.into());
    }

    Ok(())
}
