//! Wall-clock stopwatch for the benchmark run

use std::time::Duration;

use tokio::time::Instant;

/// Measures the duration between [`start`](Self::start) and
/// [`stop`](Self::stop).
///
/// Uses the tokio clock so paused-time tests observe virtual time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElapsedTimer {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl ElapsedTimer {
    /// Create an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reference instant
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.stopped_at = None;
    }

    /// Record the end instant
    pub fn stop(&mut self) {
        self.stopped_at = Some(Instant::now());
    }

    /// Duration between start and stop, `None` until both have been called
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(stop)) => Some(stop.saturating_duration_since(start)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_undefined_before_stop() {
        let mut timer = ElapsedTimer::new();
        assert!(timer.elapsed().is_none());

        timer.start();
        assert!(timer.elapsed().is_none());
    }

    #[test]
    fn test_stop_without_start() {
        let mut timer = ElapsedTimer::new();
        timer.stop();
        assert!(timer.elapsed().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_after_stop() {
        let mut timer = ElapsedTimer::new();
        timer.start();
        tokio::time::sleep(Duration::from_millis(250)).await;
        timer.stop();

        assert_eq!(timer.elapsed(), Some(Duration::from_millis(250)));
    }
}
