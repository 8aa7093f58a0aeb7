//! # Run log
//!
//! [`RunLog`] is the explicit logging context of one pipeline run. It owns the log file and
//! the `tracing` subscriber writing to it:
//!
//! * [`RunLog::open`] truncates (or creates) the file and installs an INFO-level
//!   `tracing_subscriber::fmt` subscriber as the default for the current thread,
//! * every component logs through the `tracing` macros while the context is alive,
//! * [`RunLog::close`] syncs the file and uninstalls the subscriber.
//!
//! Lines have the shape `target - LEVEL - message`, without timestamps or colours.
use std::{fmt, fs::File, sync::Arc};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{level_filters::LevelFilter, subscriber::DefaultGuard, Event, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

use crate::target_query_errors::TargetQueryError;

/// `target - LEVEL - message` line format.
struct PlainFormat;

impl<S, N> FormatEvent<S, N> for PlainFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(writer, "{} - {} - ", metadata.target(), metadata.level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file and subscriber of one run.
pub struct RunLog {
    path: Utf8PathBuf,
    file: Arc<File>,
    guard: DefaultGuard,
}

impl fmt::Debug for RunLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLog").field("path", &self.path).finish()
    }
}

impl RunLog {
    /// Open the log file and start routing the thread's events to it.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – Log file, overwritten if it exists. Its parent directory is created.
    ///
    /// Return
    /// ----------
    /// * The live logging context, or a [`TargetQueryError::IoError`] if the file cannot be
    ///   created.
    pub fn open(path: &Utf8Path) -> Result<Self, TargetQueryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = Arc::new(File::create(path)?);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::INFO)
            .with_ansi(false)
            .with_writer(Arc::clone(&file))
            .event_format(PlainFormat)
            .finish();

        Ok(RunLog {
            path: path.to_path_buf(),
            file,
            guard: tracing::subscriber::set_default(subscriber),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Flush the log file to disk and uninstall the subscriber.
    pub fn close(self) -> Result<(), TargetQueryError> {
        let RunLog { file, guard, .. } = self;
        drop(guard);
        file.sync_all()?;
        Ok(())
    }
}
