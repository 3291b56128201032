//! Synchronization primitives shared by the monitor and the workers

use tokio::sync::watch;

/// One-shot stop broadcast
///
/// Latched once cancelled; every clone observes it, including clones taken
/// after the fact.
pub type StopSignal = tokio_util::sync::CancellationToken;

/// Counter-style arming barrier
///
/// Each participant calls [`arrive`](Self::arrive) once it is ready;
/// [`wait`](Self::wait) resolves when every expected participant has arrived.
/// Arriving never blocks.
#[derive(Debug)]
pub struct ArmingBarrier {
    pending: watch::Sender<usize>,
}

impl ArmingBarrier {
    /// Barrier expecting `participants` arrivals
    pub fn new(participants: usize) -> Self {
        let (pending, _) = watch::channel(participants);
        Self { pending }
    }

    /// Signal that one participant is ready
    pub fn arrive(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Participants that have not arrived yet
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Wait until every participant has arrived
    pub async fn wait(&self) {
        let mut rx = self.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|pending| *pending == 0).await;
    }
}
