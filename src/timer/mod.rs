pub mod progress;

use std::fmt;

use log::{debug, info};
use thiserror::Error;

/// Largest accepted value of the hours field.
pub const MAX_HOURS: u32 = 23;
/// Largest accepted value of the minutes field.
pub const MAX_MINUTES: u32 = 59;
/// Largest accepted value of the seconds field.
pub const MAX_SECONDS: u32 = 59;

/// Where a countdown currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing configured, both counters at zero.
    Idle,
    /// Counting down once per tick.
    Running,
    /// Frozen by the user, waiting to be resumed.
    Paused,
    /// Reached zero.
    Finished,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// All fields resolved to a zero length countdown.
    #[error("no time set")]
    NoTimeSet,
    #[error("cannot {action} a timer that is {status}")]
    InvalidTransition { action: &'static str, status: Status },
}

/// Identifies one countdown, from [`Timer::start`] to finish or reset.
pub type RunId = u64;

/// Notification produced by a single [`Timer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed and the countdown is still going.
    Tick {
        run: RunId,
        remaining: u32,
        total: u32,
    },
    /// The countdown reached zero.
    Finished { run: RunId },
}

impl TimerEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, TimerEvent::Finished { .. })
    }

    /// The run that produced this event.
    pub fn run(&self) -> RunId {
        match *self {
            TimerEvent::Tick { run, .. } | TimerEvent::Finished { run } => run,
        }
    }
}

/// Point-in-time copy of the timer counters, handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub status: Status,
    pub remaining: u32,
    pub total: u32,
}

/// The countdown state machine.
///
/// The timer itself knows nothing about threads or windows. Whoever drives it
/// calls [`Timer::tick`] once per elapsed second while it is running, and the
/// user facing actions map onto [`Timer::start`], [`Timer::pause`],
/// [`Timer::resume`] and [`Timer::reset`].
#[derive(Debug)]
pub struct Timer {
    /// Duration of the current run in seconds.
    ///
    /// Only written when a fresh run starts and by [`Timer::reset`].
    total: u32,
    /// Seconds left in the current run.
    remaining: u32,
    /// Duration picked by the last successful [`Timer::configure`], consumed by
    /// the next [`Timer::start`].
    configured: u32,
    status: Status,
    /// Id of the latest run started, 0 before the first one.
    run: RunId,
    /// Id of the latest run that was cut short by [`Timer::reset`].
    cancelled: RunId,
}

impl Timer {
    /// Create an idle timer with both counters at zero.
    pub fn new() -> Self {
        Self {
            total: 0,
            remaining: 0,
            configured: 0,
            status: Status::Idle,
            run: 0,
            cancelled: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Id of the current, or last, run.
    pub fn run(&self) -> RunId {
        self.run
    }

    /// If the given run was reset before it could finish on its own.
    pub fn is_cancelled(&self, run: RunId) -> bool {
        run <= self.cancelled
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            remaining: self.remaining,
            total: self.total,
        }
    }

    /// Pick the duration of the next run.
    ///
    /// Each component is clamped to its natural range before the total is
    /// computed. Nothing changes if the result is zero.
    ///
    /// # Arguments
    ///
    /// * `hours` - Hours, clamped to `0..=23`.
    /// * `minutes` - Minutes, clamped to `0..=59`.
    /// * `seconds` - Seconds, clamped to `0..=59`.
    pub fn configure(
        &mut self,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<u32, TimerError> {
        self.expect_fresh("configure")?;

        let total = hours.min(MAX_HOURS) * 3600
            + minutes.min(MAX_MINUTES) * 60
            + seconds.min(MAX_SECONDS);
        if total == 0 {
            return Err(TimerError::NoTimeSet);
        }

        debug!("Configured countdown of {}s", total);
        self.configured = total;
        Ok(total)
    }

    /// Begin a fresh run from the configured duration.
    pub fn start(&mut self) -> Result<(), TimerError> {
        self.expect_fresh("start")?;
        if self.configured == 0 {
            return Err(TimerError::NoTimeSet);
        }

        self.run += 1;
        self.total = self.configured;
        self.remaining = self.configured;
        self.status = Status::Running;
        info!("Countdown {} started ({}s)", self.run, self.total);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        self.transition("pause", Status::Running, Status::Paused)?;
        info!("Countdown paused at {}s", self.remaining);
        Ok(())
    }

    /// Continue a paused run from the seconds that were left.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        self.transition("resume", Status::Paused, Status::Running)?;
        info!("Countdown resumed at {}s", self.remaining);
        Ok(())
    }

    /// Return to [`Status::Idle`] from any state.
    ///
    /// The current run counts as cancelled, even if it already finished.
    pub fn reset(&mut self) {
        self.cancelled = self.run;
        self.total = 0;
        self.remaining = 0;
        self.configured = 0;
        self.status = Status::Idle;
        info!("Countdown reset");
    }

    /// Count down one second.
    ///
    /// Does nothing and returns `None` unless the timer is running, so a pause
    /// that lands between a wake up and this call is always honored.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.status != Status::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        debug!("Tick, {}s left", self.remaining);

        if self.remaining == 0 {
            self.status = Status::Finished;
            info!("Countdown finished");
            Some(TimerEvent::Finished { run: self.run })
        } else {
            Some(TimerEvent::Tick {
                run: self.run,
                remaining: self.remaining,
                total: self.total,
            })
        }
    }

    /// A new run may only be set up while idle or after the last one finished.
    fn expect_fresh(&self, action: &'static str) -> Result<(), TimerError> {
        match self.status {
            Status::Idle | Status::Finished => Ok(()),
            status => Err(TimerError::InvalidTransition { action, status }),
        }
    }

    fn transition(
        &mut self,
        action: &'static str,
        from: Status,
        to: Status,
    ) -> Result<(), TimerError> {
        if self.status != from {
            return Err(TimerError::InvalidTransition {
                action,
                status: self.status,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
