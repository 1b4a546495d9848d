//! ---
//! dre_section: "01-core-functionality"
//! dre_subsection: "module"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Tracing subscriber setup for console and rolling file output."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "DRE_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Console layout for emitted log lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    StructuredJson,
    #[default]
    Pretty,
}

/// Owns the background log writers. Dropping it flushes every buffered line,
/// so it must outlive the last log call.
#[must_use = "dropping the guard stops the log writers"]
#[derive(Debug)]
pub struct LogGuard {
    _file: WorkerGuard,
    _stdout: WorkerGuard,
}

fn resolve_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); defaulting to {} logging",
                LOG_ENV, err, DEFAULT_DIRECTIVE
            );
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        Err(_) => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Console plus daily rolling JSON file, both behind non-blocking writers.
fn build_subscriber(
    service_name: &str,
    config: &LoggingConfig,
    filter: EnvFilter,
) -> Result<(impl Subscriber + Send + Sync + 'static, LogGuard)> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!(
            "unable to create log directory {}",
            config.directory.display()
        )
    })?;
    let file_name = format!(
        "{}.log",
        config.file_prefix.as_deref().unwrap_or(service_name)
    );

    let (file_writer, file_guard) =
        tracing_appender::non_blocking(daily(&config.directory, file_name));
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let console = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .json()
            .with_writer(stdout_writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .compact()
            .with_writer(stdout_writer)
            .boxed(),
    };
    let file = fmt::layer().json().with_writer(file_writer).boxed();

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file);
    Ok((
        subscriber,
        LogGuard {
            _file: file_guard,
            _stdout: stdout_guard,
        },
    ))
}

/// Install the global subscriber and return the guard that keeps it writing.
///
/// * `DRE_LOG` overrides the filter (e.g. `info`, `debug,dre_sim=trace`). When unset
///   `RUST_LOG` is honoured, finally defaulting to `info`.
/// * Console output follows [`LoggingConfig::format`]; a daily rolling JSON file is
///   written under [`LoggingConfig::directory`].
///
/// Hold the returned [`LogGuard`] until the process is about to exit. If a global
/// subscriber is already installed the existing one stays in place.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<LogGuard> {
    let (subscriber, guard) = build_subscriber(service_name, config, resolve_filter())?;
    if subscriber.try_init().is_ok() {
        info!(service = %service_name, log_dir = %config.directory.display(), format = ?config.format, "tracing initialised");
    }
    Ok(guard)
}
