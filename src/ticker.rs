use std::{
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, info, warn};
use winit::event_loop::EventLoopProxy;

use crate::timer::{Timer, TimerEvent};

/// Interval between two ticks of a countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Somewhere the ticker can post timer events to.
///
/// The ticker runs on its own thread, so the receiving end is expected to hand
/// the events over to whichever thread owns the presentation.
pub trait Notify: Send + 'static {
    /// Deliver an event. Returns false once the receiver is gone.
    fn notify(&self, event: TimerEvent) -> bool;
}

impl Notify for EventLoopProxy<TimerEvent> {
    fn notify(&self, event: TimerEvent) -> bool {
        self.send_event(event).is_ok()
    }
}

impl Notify for mpsc::Sender<TimerEvent> {
    fn notify(&self, event: TimerEvent) -> bool {
        self.send(event).is_ok()
    }
}

struct Worker {
    /// Dropping this wakes the worker and makes it exit.
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Drives a shared [`Timer`] from a background thread.
///
/// At most one worker thread exists at a time. Starting the ticker while a
/// worker is alive stops and joins that worker first.
pub struct Ticker {
    interval: Duration,
    worker: Option<Worker>,
}

impl Ticker {
    /// Create a new ticker.
    ///
    /// # Arguments
    ///
    /// * `interval` - The time to wait before each tick.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            worker: None,
        }
    }

    /// Spawn the worker thread for a running timer.
    ///
    /// # Arguments
    ///
    /// * `timer` - The timer to tick.
    /// * `notify` - Where every event produced by a tick is posted.
    pub fn start<N: Notify>(&mut self, timer: Arc<Mutex<Timer>>, notify: N) {
        self.stop();

        let (stop, stopped) = mpsc::channel();
        let interval = self.interval;
        let handle = thread::spawn(move || run(timer, notify, interval, stopped));

        debug!("Ticker started");
        self.worker = Some(Worker { stop, handle });
    }

    /// Stop the worker thread, if any, and wait for it to exit.
    ///
    /// The worker never touches the timer after this returns.
    pub fn stop(&mut self) {
        if let Some(Worker { stop, handle }) = self.worker.take() {
            drop(stop);
            if handle.join().is_err() {
                warn!("Ticker thread panicked");
            }
            debug!("Ticker stopped");
        }
    }

    /// If a worker thread is currently attached.
    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the worker thread.
///
/// Waits one interval, ticks, posts the event and repeats until the timer
/// stops running, finishes, or the stop channel closes.
fn run<N: Notify>(
    timer: Arc<Mutex<Timer>>,
    notify: N,
    interval: Duration,
    stopped: mpsc::Receiver<()>,
) {
    loop {
        match stopped.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => (),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        // Status is checked under the same lock as the decrement.
        let event = match timer.lock() {
            Ok(mut timer) => timer.tick(),
            Err(_) => {
                warn!("Timer lock poisoned, ticker exiting");
                return;
            }
        };

        let Some(event) = event else {
            debug!("Timer no longer running, ticker exiting");
            return;
        };

        if !notify.notify(event) {
            info!("Event receiver closed, ticker exiting");
            return;
        }

        if event.is_finished() {
            return;
        }
    }
}
