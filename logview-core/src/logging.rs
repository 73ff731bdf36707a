use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "logview.log";

static INIT: OnceCell<PathBuf> = OnceCell::new();
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Where the viewer writes its own diagnostics. Kept apart from the scanned
/// plugin logs so the viewer never lists itself as a source.
pub fn diagnostics_dir() -> PathBuf {
    ProjectDirs::from("com", "logview", "logview")
        .map(|d| d.data_local_dir().join("diagnostics"))
        .unwrap_or_else(|| PathBuf::from("logview-diagnostics"))
}

/// Install the tracing subscriber once: `RUST_LOG` filter (default `info`),
/// coloured console output and a plain daily file under [`diagnostics_dir`].
/// Returns the directory actually used by the first call.
pub fn init_logging() -> &'static Path {
    INIT.get_or_init(|| {
        let mut dir = diagnostics_dir();
        if fs::create_dir_all(&dir).is_err() {
            dir = std::env::temp_dir().join("logview-diagnostics");
            let _ = fs::create_dir_all(&dir);
        }
        let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));
        let _ = FILE_GUARD.set(guard);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .with(fmt::layer().with_writer(file_writer).with_target(false).with_ansi(false))
            .try_init();
        dir
    })
}
