use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "neontype.log";

/// Send tracing output to `<dir>/neontype.log`.
///
/// `RUST_LOG` wins when set, otherwise the crate logs at info. Keep the
/// returned guard alive for the life of the program or buffered lines are
/// lost on exit.
pub fn init_file_logging(dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("neontype=info")
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    tracing::info!(log = %dir.join(LOG_FILE_NAME).display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_log_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("neontype");
        let _guard = init_file_logging(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
