//! Rolling Logger
//!
//! A `tracing` subscriber that formats each event as a single line, keeps the
//! most recent lines in a circular buffer, and forwards every line to a sink
//! (browser console, stderr, ...).
//!
//! ```rust,ignore
//! rolling_logger::init_logger("LiveNotes", rolling_logger::DEFAULT_CAPACITY, rolling_logger::stderr_sink)?;
//! tracing::info!("started");
//! let recent = rolling_logger::recent_lines();
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Default number of lines kept in memory
pub const DEFAULT_CAPACITY: usize = 200;

/// Wall-clock prefix of every line
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Receives every formatted line after it has been buffered
pub type Sink = fn(&str);

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("a global logger is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Bounded, shareable buffer of formatted log lines
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one when full
    pub fn push(&self, line: String) {
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn recent(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().ok().and_then(|lines| lines.back().cloned())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// `MakeWriter` handing out one `LineWriter` per event
#[derive(Clone)]
pub struct RollingWriter {
    app_name: Arc<str>,
    buffer: LogBuffer,
    sink: Sink,
}

impl RollingWriter {
    pub fn new(app_name: &str, buffer: LogBuffer, sink: Sink) -> Self {
        Self {
            app_name: Arc::from(app_name),
            buffer,
            sink,
        }
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            bytes: Vec::with_capacity(128),
            app_name: self.app_name.clone(),
            buffer: self.buffer.clone(),
            sink: self.sink,
        }
    }
}

/// Collects the bytes of one formatted event; commits them on drop
pub struct LineWriter {
    bytes: Vec<u8>,
    app_name: Arc<str>,
    buffer: LogBuffer,
    sink: Sink,
}

impl io::Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.bytes);
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        let line = format!("[{}] {}", self.app_name, text);
        (self.sink)(&line);
        self.buffer.push(line);
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Build the formatting layer without installing it
pub fn layer<S>(app_name: &str, buffer: LogBuffer, sink: Sink) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(RollingWriter::new(app_name, buffer, sink))
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(default_level())
}

/// Install the rolling logger as the global default subscriber.
///
/// Returns the buffer backing it; the same buffer is reachable later through
/// [`recent_lines`] and [`last_line`].
pub fn init_logger(app_name: &str, capacity: usize, sink: Sink) -> Result<LogBuffer, LoggerError> {
    let buffer = LogBuffer::new(capacity);
    tracing_subscriber::registry()
        .with(layer(app_name, buffer.clone(), sink))
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;
    let _ = GLOBAL_BUFFER.set(buffer.clone());
    tracing::info!(app = app_name, capacity = buffer.capacity(), "logger initialized");
    Ok(buffer)
}

/// Lines held by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    GLOBAL_BUFFER.get().map(LogBuffer::recent).unwrap_or_default()
}

pub fn last_line() -> Option<String> {
    GLOBAL_BUFFER.get().and_then(LogBuffer::last)
}

pub fn stderr_sink(line: &str) {
    eprintln!("{line}");
}

pub fn discard_sink(_line: &str) {}
