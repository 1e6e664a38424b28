use std::io::Write;
use std::path::Path;

use flexi_logger::{
    Cleanup, Criterion, DeferredNow, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::Record;

/// Start the global logger.
///
/// `spec` is a `flexi_logger` spec such as `"info"` or `"lifelight::data=debug"`;
/// `RUST_LOG` overrides it when set. Lines always go to stderr and, with a
/// `log_dir`, also to a size-rotated `lifelight.log` in that directory.
///
/// Keep the returned handle alive for the whole run so buffered lines are
/// flushed on exit. A second call fails because a logger is already installed.
pub fn init(spec: &str, log_dir: Option<&Path>) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(spec)?.format(line_format);

    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(
                FileSpec::default()
                    .directory(dir)
                    .basename("lifelight")
                    .suffix("log"),
            )
            .duplicate_to_stderr(Duplicate::All)
            .rotate(Criterion::Size(5_000_000), Naming::Numbers, Cleanup::KeepLogFiles(5))
            .write_mode(WriteMode::BufferAndFlush),
        None => logger.log_to_stderr(),
    };

    let handle = logger.start()?;
    if let Some(dir) = log_dir {
        log::info!("logging to {}", dir.display());
    }
    Ok(handle)
}

/// `{timestamp} {level} [{module}] {message}`
pub fn line_format(
    write: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        write,
        "{} {:5} [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unknown>"),
        record.args()
    )
}
