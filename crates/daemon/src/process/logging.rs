use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::ServiceConfig;

const LOG_FILE_PREFIX: &str = "sharegate.log";

/// Keeps the non-blocking writers flushing; logs are lost once dropped
#[must_use]
pub struct LogGuards(#[allow(dead_code)] Vec<WorkerGuard>);

fn filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Compact stdout logging, plus a daily-rotated file when `log_dir` is set
pub fn init(config: &ServiceConfig) -> LogGuards {
    let (stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let mut guards = vec![stdout_guard];

    let console = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout)
        .with_filter(filter(config.log_level));

    let file = config.log_dir.as_deref().map(|dir| {
        let (writer, guard) = tracing_appender::non_blocking(rolling_file(dir));
        guards.push(guard);

        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter(config.log_level))
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    install_panic_hook();
    log_build();

    LogGuards(guards)
}

fn rolling_file(dir: &Path) -> tracing_appender::rolling::RollingFileAppender {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("warning: can't create log directory {}: {}", dir.display(), e);
    }
    tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)
}

/// Panics go through tracing so they land in the log file too
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location();
        tracing::error!(
            message = %info,
            file = location.map(|l| l.file()),
            line = location.map(|l| l.line()),
            "panic"
        );
    }));
}

fn log_build() {
    let build = common::build_info!();
    tracing::info!(
        version = build.version,
        profile = build.build_profile,
        features = build.build_features,
        "sharegate daemon starting"
    );
}
