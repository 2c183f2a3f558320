//! Per-question countdown.
//!
//! Each displayed question gets one [`Countdown`] task that reports the
//! remaining seconds and finally an expiry. Dropping or cancelling the handle
//! aborts the task, so a countdown for an answered question can never fire.
//! Events also carry the question position, letting the receiver discard
//! anything that was already in flight.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { question: usize, remaining: u32 },
    Expired { question: usize },
}

/// Handle to a running countdown. The task is aborted when the handle is
/// cancelled or dropped.
#[derive(Debug)]
pub struct Countdown {
    question: usize,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a countdown of `seconds` ticks, one every `period`, for the
    /// question at `question`. Must be called inside a tokio runtime.
    pub fn start(
        question: usize,
        seconds: u32,
        period: Duration,
        events: UnboundedSender<TimerEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut remaining = seconds;
            while remaining > 0 {
                tokio::time::sleep(period).await;
                remaining -= 1;
                if events.send(TimerEvent::Tick { question, remaining }).is_err() {
                    return;
                }
            }
            let _ = events.send(TimerEvent::Expired { question });
        });

        Self { question, handle }
    }

    pub fn question(&self) -> usize {
        self.question
    }

    pub fn cancel(self) {
        // abort happens in Drop
        trace!(question = self.question, "countdown cancelled");
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
