//! Human-readable progress notifications emitted during a run

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

/// A progress notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The run is armed and timing has started
    Benchmarking {
        /// Target description
        target: String,
    },
    /// A progress checkpoint was reached
    Completed(usize),
    /// The request quota was reached
    Finished(usize),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Benchmarking { target } => {
                write!(f, "Benchmarking {} (be patient)", target)
            }
            ProgressEvent::Completed(n) => write!(f, "Completed {} requests", n),
            ProgressEvent::Finished(n) => write!(f, "Finished {} requests", n),
        }
    }
}

/// Sink for progress notifications
pub trait ProgressReporter: Send + Sync {
    /// Emit one notification
    fn report(&self, event: ProgressEvent);
}

/// Writes each notification on its own line
///
/// Goes to stderr unless another writer is given, so stdout only carries
/// the final report.
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    /// Report to stderr
    pub fn new() -> Self {
        Self::with_writer(std::io::stderr())
    }

    /// Report to `writer`
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleReporter").finish_non_exhaustive()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{}", event).and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "Failed to write progress line");
        }
    }
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Collects notifications for assertions
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingReporter {
    events: std::sync::Arc<std::sync::Mutex<Vec<ProgressEvent>>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
