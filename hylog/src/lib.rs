//! Coloured, timestamped stderr backend for the [`log`] facade.
//!
//! Libraries of the workspace only emit records through `log`; binaries call
//! [`init`] once at startup to have them printed as
//! `timestamp LEVEL module: message`.
use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use strum::FromRepr;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Logger levels, ordered from the most to the least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[repr(u32)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Maps a `-v` count onto a level: no flag shows warnings, each
    /// additional flag one more level of detail.
    pub fn from_verbosity(count: u8) -> Self {
        let repr = (LogLevel::Warn as u32).saturating_sub(count as u32);
        LogLevel::from_repr(repr).unwrap_or(LogLevel::Trace)
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }

    fn from_level(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogLevel::Trace,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Error => LogLevel::Error,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Warn => "WARN ",
            LogLevel::Error => "ERROR",
        }
    }

    fn color(self) -> Color {
        match self {
            LogLevel::Trace => Color::Magenta,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }
}

/// One formatted log record.
pub struct LogMessage {
    pub level: LogLevel,
    pub timepoint: chrono::NaiveDateTime,
    pub message: String,
    pub module: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub thread_name: Option<String>,
}

impl LogMessage {
    pub fn from_record(record: &Record<'_>) -> Self {
        Self {
            level: LogLevel::from_level(record.level()),
            timepoint: chrono::Local::now().naive_local(),
            message: record.args().to_string(),
            module: record
                .module_path()
                .unwrap_or_else(|| record.target())
                .to_string(),
            file: record.file().map(str::to_string),
            line: record.line(),
            thread_name: std::thread::current().name().map(str::to_string),
        }
    }

    /// Writes the message on a single line. Only the level is coloured.
    pub fn write_to<W: WriteColor>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{} ", self.timepoint.format("%Y-%m-%d %H:%M:%S%.3f"))?;
        out.set_color(ColorSpec::new().set_fg(Some(self.level.color())).set_bold(true))?;
        write!(out, "{}", self.level.label())?;
        out.reset()?;
        if let Some(thread) = self.thread_name.as_deref().filter(|&t| t != "main") {
            write!(out, " [{thread}]")?;
        }
        write!(out, " {}", self.module)?;
        if let (true, Some(file), Some(line)) =
            (self.level <= LogLevel::Debug, &self.file, self.line)
        {
            write!(out, " ({file}:{line})")?;
        }
        writeln!(out, ": {}", self.message)
    }
}

/// Logger writing every enabled record to stderr.
pub struct StderrLogger {
    level: LogLevel,
    choice: ColorChoice,
}

impl StderrLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            choice: ColorChoice::Auto,
        }
    }

    pub fn with_color(mut self, choice: ColorChoice) -> Self {
        self.choice = choice;
        self
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.to_filter()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let stream = StandardStream::stderr(self.choice);
        let mut stream = stream.lock();
        // Nothing sensible to do when stderr itself is gone.
        let _ = LogMessage::from_record(record).write_to(&mut stream);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs a [`StderrLogger`] as the global logger.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger::new(level)))?;
    log::set_max_level(level.to_filter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(3), LogLevel::Trace);
        assert_eq!(LogLevel::from_verbosity(200), LogLevel::Trace);
    }

    #[test]
    fn message_layout() {
        let message = LogMessage {
            level: LogLevel::Info,
            timepoint: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_milli_opt(3, 4, 5, 6)
                .unwrap(),
            message: "hello".to_string(),
            module: "hyauto::run".to_string(),
            file: Some("run.rs".to_string()),
            line: Some(12),
            thread_name: Some("main".to_string()),
        };
        let mut out = NoColor::new(Vec::new());
        message.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "2024-01-02 03:04:05.006 INFO  hyauto::run: hello\n"
        );
    }

    #[test]
    fn debug_messages_carry_their_location() {
        let message = LogMessage {
            level: LogLevel::Debug,
            timepoint: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            message: "search done".to_string(),
            module: "hyauto::run".to_string(),
            file: Some("run.rs".to_string()),
            line: Some(7),
            thread_name: Some("worker".to_string()),
        };
        let mut out = NoColor::new(Vec::new());
        message.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "2024-01-02 00:00:00.000 DEBUG [worker] hyauto::run (run.rs:7): search done\n"
        );
    }
}
