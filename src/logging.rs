//! The run log.
//!
//! Every run appends to `automation.log` in the log directory. The file is
//! rolled over once per calendar day to `automation.log.YYYY-MM-DD`, and only
//! the newest [`RETAINED_LOGS`] of those are kept.

use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "automation.log";
pub const RETAINED_LOGS: usize = 7;

const ROTATED_DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(String),

    #[error("Failed to rotate log files: {0}")]
    Rotation(#[from] io::Error),

    #[error("Failed to initialize logger: {0}")]
    InitializationFailed(String),
}

/// `2024-03-01 14:05:30,123 - INFO - message`
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format(TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn rotated_name(date: NaiveDate) -> String {
    format!("{}.{}", LOG_FILE_NAME, date.format(ROTATED_DATE_FORMAT))
}

fn parse_rotated_name(name: &str) -> Option<NaiveDate> {
    let suffix = name.strip_prefix(LOG_FILE_NAME)?.strip_prefix('.')?;
    NaiveDate::parse_from_str(suffix, ROTATED_DATE_FORMAT).ok()
}

/// Renames the current log aside if it was last written before `today`.
pub fn rotate_stale_log(log_dir: &Path, today: NaiveDate) -> io::Result<()> {
    let current = log_dir.join(LOG_FILE_NAME);
    let modified = match fs::metadata(&current) {
        Ok(metadata) => metadata.modified()?,
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    let written = DateTime::<Local>::from(modified).date_naive();
    if written >= today {
        return Ok(());
    }
    let rotated = log_dir.join(rotated_name(written));
    if rotated.exists() {
        fs::remove_file(&rotated)?;
    }
    fs::rename(&current, &rotated)
}

/// Deletes rotated logs beyond the newest `keep`. Other files are left alone.
pub fn prune_rotated_logs(log_dir: &Path, keep: usize) -> io::Result<()> {
    let mut rotated = vec![];
    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(date) = name.to_str().and_then(parse_rotated_name) {
            rotated.push((date, entry.path()));
        }
    }
    rotated.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in rotated.into_iter().skip(keep) {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Rolls over stale logs and installs the global subscriber writing to
/// `log_dir/automation.log`. Returns the path of that file.
///
/// Writes are blocking, so everything logged is on disk when the file is
/// read back for the summary mail.
pub fn init_logger(log_dir: &Path) -> Result<PathBuf, LoggerError> {
    fs::create_dir_all(log_dir).map_err(|e| {
        LoggerError::DirectoryCreationFailed(format!("{}: {}", log_dir.display(), e))
    })?;
    rotate_stale_log(log_dir, Local::now().date_naive())?;
    prune_rotated_logs(log_dir, RETAINED_LOGS)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .map_err(|e| LoggerError::InitializationFailed(e.to_string()))?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .event_format(LineFormat)
        .with_writer(appender)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggerError::InitializationFailed(e.to_string()))?;

    Ok(log_dir.join(LOG_FILE_NAME))
}
