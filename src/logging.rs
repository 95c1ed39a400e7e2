// src/logging.rs

use crate::config::Config;
use crate::errors::{CatalogChatError, CatalogChatResult};
use crate::models::ExchangeLog;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle, WriteMode};
use log::info;

const SUMMARY_CHARS: usize = 60;

/// Starts file logging. The terminal belongs to the UI, so nothing goes to
/// stdout or stderr. Keep the handle alive for the program's lifetime.
pub fn init_logging(config: &Config) -> CatalogChatResult<LoggerHandle> {
    Logger::try_with_str(&config.log_level)
        .map_err(|e| CatalogChatError::logging_error(format!("Invalid log level: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename("catalog-chat"),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format(detailed_format)
        .start()
        .map_err(|e| CatalogChatError::logging_error(format!("Failed to start logger: {}", e)))
}

/// Logs a completed chat exchange.
pub fn log_exchange(log: &ExchangeLog) {
    info!(
        "[{}] {} - {} - Outcome: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.outcome,
        log.response_time_ms
    );
}

/// Shortens a query for the log line.
pub fn summarize_query(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(SUMMARY_CHARS).collect();
    if chars.next().is_some() {
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", head)
    }
}
