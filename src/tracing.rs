use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

const LOG_FILE: &str = "parser.log";

/**
Logs go to stdout and to `parser.log` next to the binary. The returned guard
must stay alive until the run ends, or buffered lines are lost.
*/
pub fn setup_logging() -> WorkerGuard {
    let (log_file, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        ".", LOG_FILE,
    ));

    let filter = filter::Targets::new()
        .with_target("sportefir", Level::DEBUG)
        .with_default(Level::WARN);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(log_file))
        .init();

    guard
}
