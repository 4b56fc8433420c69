//! Periodic re-run of a job on an injectable clock
//!
//! The job runs once as soon as the loop starts, then again every
//! `interval` after the previous run finished. Between checks the loop
//! sleeps for one `tick`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// Source of time for the scheduler
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock time with tokio sleeps
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that only moves when told to. Sleeping advances it instantly.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += to_delta(duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

/// Work the scheduler runs
#[allow(async_fn_in_trait)]
pub trait Job {
    type Output;
    async fn run(&mut self) -> Self::Output;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    RunningCycle,
}

/// Timer-driven invocation of a [`Job`]
pub struct PeriodicTask<C: Clock> {
    clock: C,
    interval: Duration,
    tick: Duration,
    next_run: DateTime<Utc>,
    state: TaskState,
    runs: u64,
}

impl<C: Clock> PeriodicTask<C> {
    /// First run is due immediately
    pub fn new(clock: C, interval: Duration, tick: Duration) -> Self {
        let next_run = clock.now();
        Self {
            clock,
            interval,
            tick,
            next_run,
            state: TaskState::Idle,
            runs: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state
    }

    #[must_use]
    pub fn next_run(&self) -> DateTime<Utc> {
        self.next_run
    }

    /// Completed runs so far
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    #[must_use]
    pub fn is_due(&self) -> bool {
        self.state == TaskState::Idle && self.clock.now() >= self.next_run
    }

    /// Run the job if it is due; `None` if it was not
    pub async fn run_pending<J: Job>(&mut self, job: &mut J) -> Option<J::Output> {
        if !self.is_due() {
            return None;
        }

        self.state = TaskState::RunningCycle;
        let output = job.run().await;
        self.state = TaskState::Idle;
        self.runs += 1;
        self.next_run = self.clock.now() + to_delta(self.interval);
        debug!("Run {} finished, next run at {}", self.runs, self.next_run);

        Some(output)
    }

    /// Check every tick and run whenever due. Never returns.
    pub async fn run_forever<J: Job>(&mut self, job: &mut J) {
        loop {
            self.run_pending(job).await;
            self.clock.sleep(self.tick).await;
        }
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
