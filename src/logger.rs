use core::{fmt, str::FromStr};
use std::{
    env,
    io::{self, Write},
};

use log::{LevelFilter, Metadata, Record};
use spin::Mutex;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Environment variable holding the stderr log filter.
pub const LOG_LEVEL_ENV: &str = "FPSIG_LOG_LEVEL";

/// Installs the global logger on stderr. Stdout is left to the demonstrations.
pub fn init(process_name: &str) {
    let requested = env::var(LOG_LEVEL_ENV).ok();
    let level = level_from(requested.as_deref());

    let logger = DemoLogger::new(io::stderr())
        .with_filter(level)
        .with_process_name(process_name);
    if logger.enable().is_err() {
        log::error!("Logger already initialized");
    }

    if let Some(value) = &requested {
        if LevelFilter::from_str(value.trim()).is_err() {
            log::warn!("ignoring {LOG_LEVEL_ENV}={value:?}, using {DEFAULT_LOG_LEVEL}");
        }
    }
    #[cfg(feature = "no_trace")]
    if level == LevelFilter::Trace {
        log::warn!(
            "The 'no_trace' feature is enabled but {LOG_LEVEL_ENV}=TRACE, there will be no trace logs"
        );
    }
}

/// Parses a level name case-insensitively, falling back to the default.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

pub struct DemoLogger {
    endpoint: Mutex<Box<dyn Write + Send + 'static>>,
    filter: LevelFilter,
    process_name: Option<String>,
}

impl fmt::Debug for DemoLogger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DemoLogger")
            .field("endpoint", &"opaque")
            .field("filter", &self.filter)
            .field("process_name", &self.process_name)
            .finish()
    }
}

impl DemoLogger {
    pub fn new<T>(endpoint: T) -> Self
    where
        T: Write + Send + 'static,
    {
        let endpoint: Box<dyn Write + Send + 'static> = Box::new(endpoint);
        Self {
            endpoint: Mutex::new(endpoint),
            filter: DEFAULT_LOG_LEVEL,
            process_name: None,
        }
    }
    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }
    pub fn with_process_name(mut self, name: &str) -> Self {
        self.process_name = Some(name.to_owned());
        self
    }
    pub fn enable(self) -> Result<&'static Self, log::SetLoggerError> {
        let leak = Box::leak(Box::new(self));
        log::set_logger(leak)?;
        log::set_max_level(leak.filter);
        Ok(leak)
    }
    fn write_record<W: Write + ?Sized>(
        record: &Record,
        process_name: Option<&str>,
        writer: &mut W,
    ) -> io::Result<()> {
        let target = record.module_path().unwrap_or(record.target());
        let level = record.level();
        let message = record.args();

        let process_name = process_name.unwrap_or("");
        let line = &LineFmt(record.line());
        writeln!(writer, "[{process_name}@{target}{line} {level}] {message}")
    }
}

impl log::Log for DemoLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut endpoint = self.endpoint.lock();
        let _ = Self::write_record(record, self.process_name.as_deref(), endpoint.as_mut());
    }
    fn flush(&self) {
        let _ = self.endpoint.lock().flush();
    }
}

struct LineFmt(Option<u32>);
impl fmt::Display for LineFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(line) = self.0 {
            write!(f, ":{line}")
        } else {
            Ok(())
        }
    }
}
