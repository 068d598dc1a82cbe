use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::config::GateSettings;
use crate::gate::budget::{BudgetCalculator, Remaining};
use crate::gate::session::{SharedSession, UserSession};

/// Event raised by the reading tick process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// One more second was read
    Tick {
        reading_time_today: u64,
        remaining_seconds: u64,
    },
    /// Free budget exhausted; the tick process has stopped
    Blocked { reading_time_today: u64 },
    /// Session became premium; the tick process has stopped
    Unlocked,
}

/// Receives gate events from the tick process
pub trait GateObserver: Send + Sync {
    fn notify(&self, event: GateEvent);
}

impl GateObserver for UnboundedSender<GateEvent> {
    fn notify(&self, event: GateEvent) {
        // A closed receiver means the view already went away
        let _ = self.send(event);
    }
}

/// Free-tier access gate
#[derive(Debug, Clone)]
pub struct AccessGate {
    limit_seconds: u64,
    tick_interval: Duration,
}

impl AccessGate {
    pub fn new(settings: &GateSettings) -> Self {
        Self {
            limit_seconds: settings.daily_free_limit_seconds,
            tick_interval: settings.tick_interval(),
        }
    }

    pub fn limit_seconds(&self) -> u64 {
        self.limit_seconds
    }

    pub fn compute_remaining(&self, session: &UserSession) -> Remaining {
        BudgetCalculator::calculate_remaining(self.limit_seconds, session)
    }

    pub fn is_blocked(&self, session: &UserSession) -> bool {
        BudgetCalculator::is_blocked(self.limit_seconds, session)
    }

    /// Start metering reading time for `session`
    ///
    /// Premium sessions get an inert handle. A session that is already out of
    /// budget is reported as blocked right away and no task is spawned.
    /// Must be called from within a Tokio runtime.
    pub fn start_session(
        &self,
        session: &SharedSession,
        observer: Arc<dyn GateObserver>,
    ) -> TickHandle {
        let current = session.snapshot();

        if current.is_premium {
            debug!("Premium session {}, not metering", current.user_id);
            return TickHandle::inert(session.clone());
        }

        if self.is_blocked(&current) {
            info!(
                "Session {} has no free reading time left ({}s used)",
                current.user_id, current.reading_time_today
            );
            observer.notify(GateEvent::Blocked {
                reading_time_today: current.reading_time_today,
            });
            return TickHandle::inert(session.clone());
        }

        info!(
            "Starting reading tick for session {} ({}s used of {}s)",
            current.user_id, current.reading_time_today, self.limit_seconds
        );

        let cancelled = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(run_ticks(
            self.limit_seconds,
            self.tick_interval,
            session.clone(),
            cancelled.clone(),
            observer,
        ));

        TickHandle {
            session: session.clone(),
            cancelled,
            task: Some(task),
        }
    }

    /// Stop the tick process behind `handle`; safe to call repeatedly
    pub fn stop_session(handle: &TickHandle) {
        handle.stop();
    }
}

enum TickOutcome {
    Counting { used: u64, remaining: u64 },
    Exhausted { used: u64 },
    Unlocked,
}

async fn run_ticks(
    limit_seconds: u64,
    period: Duration,
    session: SharedSession,
    cancelled: Arc<AtomicBool>,
    observer: Arc<dyn GateObserver>,
) {
    let mut interval = time::interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        let outcome = {
            let mut current = session.lock();

            // Checked under the session lock so nothing increments after stop() returns
            if cancelled.load(Ordering::SeqCst) {
                break;
            }

            if current.is_premium {
                TickOutcome::Unlocked
            } else {
                current.record_tick();
                let used = current.reading_time_today;
                match BudgetCalculator::calculate_remaining(limit_seconds, &current) {
                    Remaining::Seconds(0) => TickOutcome::Exhausted { used },
                    Remaining::Seconds(remaining) => TickOutcome::Counting { used, remaining },
                    Remaining::Unlimited => TickOutcome::Unlocked,
                }
            }
        };

        match outcome {
            TickOutcome::Counting { used, remaining } => {
                observer.notify(GateEvent::Tick {
                    reading_time_today: used,
                    remaining_seconds: remaining,
                });
            }
            TickOutcome::Exhausted { used } => {
                info!("Free reading time exhausted after {}s", used);
                observer.notify(GateEvent::Tick {
                    reading_time_today: used,
                    remaining_seconds: 0,
                });
                observer.notify(GateEvent::Blocked {
                    reading_time_today: used,
                });
                break;
            }
            TickOutcome::Unlocked => {
                info!("Session upgraded while reading, metering stopped");
                observer.notify(GateEvent::Unlocked);
                break;
            }
        }
    }

    debug!("Reading tick process finished");
}

/// Handle to a running tick process
///
/// Dropping the handle stops the process.
#[derive(Debug)]
pub struct TickHandle {
    session: SharedSession,
    cancelled: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    fn inert(session: SharedSession) -> Self {
        Self {
            session,
            cancelled: Arc::new(AtomicBool::new(true)),
            task: None,
        }
    }

    /// Whether the tick process is still counting
    pub fn is_running(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the tick process. Idempotent.
    pub fn stop(&self) {
        {
            let _fence = self.session.lock();
            if self.cancelled.swap(true, Ordering::SeqCst) {
                return;
            }
        }

        if let Some(task) = &self.task {
            task.abort();
        }
        debug!("Reading tick process cancelled");
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
