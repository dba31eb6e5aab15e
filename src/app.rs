use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{debug, info, warn};

use crate::{
    input::Fields,
    ticker::{Notify, Ticker},
    timer::{
        progress::{active_segments, format_hms, is_urgent},
        Snapshot, Status, Timer, TimerError, TimerEvent,
    },
};

/// Status line shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Prompt,
    Running,
    Paused,
    /// Running with little time left.
    Hurry(u32),
    Completed,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Prompt => f.write_str("Set a time and press Start"),
            Message::Running => f.write_str("Running…"),
            Message::Paused => f.write_str("Paused"),
            Message::Hurry(remaining) => write!(f, "Hurry! {}s left", remaining),
            Message::Completed => f.write_str("Timer completed!"),
        }
    }
}

/// A blocking message box the window should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    NoTimeSet,
    Completed,
}

impl Alert {
    pub fn title(&self) -> &'static str {
        match self {
            Alert::NoTimeSet => "No time set",
            Alert::Completed => "Done",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Alert::NoTimeSet => "Please enter hours, minutes, or seconds greater than zero.",
            Alert::Completed => "Your countdown has finished!",
        }
    }
}

/// Everything the screen needs to draw one frame.
#[derive(Debug)]
pub struct View<'a> {
    pub fields: &'a Fields,
    pub timer: Snapshot,
    pub message: Message,
    /// Total number of segments in the progress indicator.
    pub segments: usize,
}

impl View<'_> {
    /// Number of lit progress segments.
    pub fn active_segments(&self) -> usize {
        active_segments(self.timer.remaining, self.timer.total, self.segments)
    }

    /// If the display should be drawn in the urgent color.
    pub fn urgent(&self) -> bool {
        matches!(self.timer.status, Status::Running | Status::Paused)
            && is_urgent(self.timer.remaining)
    }
}

/// The application context.
///
/// Owns the single timer, the ticker driving it and the input fields. All
/// methods are meant to be called from the event loop thread, the ticker only
/// ever touches the timer.
pub struct App<N> {
    timer: Arc<Mutex<Timer>>,
    ticker: Ticker,
    notify: N,
    fields: Fields,
    message: Message,
    segments: usize,
}

impl<N: Notify + Clone> App<N> {
    /// Create a new application context.
    ///
    /// # Arguments
    ///
    /// * `fields` - Initial contents of the input fields.
    /// * `segments` - Size of the progress indicator.
    /// * `interval` - The time between two ticks.
    /// * `notify` - Where the ticker posts timer events.
    pub fn new(fields: Fields, segments: usize, interval: Duration, notify: N) -> Self {
        Self {
            timer: Arc::new(Mutex::new(Timer::new())),
            ticker: Ticker::new(interval),
            notify,
            fields,
            message: Message::Prompt,
            segments,
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub fn message(&self) -> Message {
        self.message
    }

    pub fn snapshot(&self) -> Snapshot {
        self.timer().snapshot()
    }

    pub fn view(&self) -> View<'_> {
        View {
            fields: &self.fields,
            timer: self.snapshot(),
            message: self.message,
            segments: self.segments,
        }
    }

    /// Label of the start/pause toggle in the current state.
    pub fn action_label(&self) -> &'static str {
        match self.timer().status() {
            Status::Idle | Status::Finished => "Start",
            Status::Running => "Pause",
            Status::Paused => "Resume",
        }
    }

    /// Window title, carrying the status line and the key bindings.
    pub fn title(&self) -> String {
        format!(
            "Countdown Timer - {} [Space: {}, R: Reset]",
            self.message,
            self.action_label()
        )
    }

    /// Start, pause or resume depending on the current state.
    ///
    /// Returns an alert when no time was set.
    pub fn toggle(&mut self) -> Option<Alert> {
        let status = self.timer().status();
        let result = match status {
            Status::Running => self.pause(),
            Status::Paused => self.resume(),
            Status::Idle | Status::Finished => self.start(),
        };

        match result {
            Ok(()) => None,
            Err(TimerError::NoTimeSet) => {
                info!("Start requested without a duration");
                Some(Alert::NoTimeSet)
            }
            Err(e) => {
                warn!("Ignoring toggle: {}", e);
                None
            }
        }
    }

    /// Stop any countdown and clear the timer and the fields.
    pub fn reset(&mut self) {
        self.timer().reset();
        self.ticker.stop();
        self.fields.clear();
        self.message = Message::Prompt;
    }

    /// Apply an event posted by the ticker.
    ///
    /// Returns the completion alert when the countdown has just finished.
    pub fn handle_timer_event(&mut self, event: TimerEvent) -> Option<Alert> {
        match event {
            TimerEvent::Tick {
                run,
                remaining,
                total,
            } => {
                debug!("{} left of {}s", format_hms(remaining), total);
                let live = {
                    let timer = self.timer();
                    timer.run() == run && timer.status() == Status::Running
                };
                if live {
                    self.message = running_message(remaining);
                }
                None
            }
            TimerEvent::Finished { run } => {
                let (current, cancelled) = {
                    let timer = self.timer();
                    (timer.run() == run, timer.is_cancelled(run))
                };

                // Left over from a run that was reset before this arrived.
                if cancelled {
                    return None;
                }

                if current {
                    info!("Countdown {} completed", run);

                    // The worker exits right after posting this, joining is immediate.
                    self.ticker.stop();
                    self.message = Message::Completed;
                } else {
                    // A new run was started before this was handled, it keeps its worker.
                    let live = self.timer().run();
                    info!("Countdown {} completed while countdown {} runs", run, live);
                }
                Some(Alert::Completed)
            }
        }
    }

    /// Stop the ticker before the window goes away.
    pub fn shutdown(&mut self) {
        if self.ticker.is_active() {
            info!("Stopping countdown on shutdown");
        }
        self.ticker.stop();
    }

    fn start(&mut self) -> Result<(), TimerError> {
        let (hours, minutes, seconds) = self.fields.values();
        let remaining = {
            let mut timer = self.timer();
            timer.configure(hours, minutes, seconds)?;
            timer.start()?;
            timer.remaining()
        };
        self.message = running_message(remaining);
        self.spawn_ticker();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), TimerError> {
        self.timer().pause()?;
        self.ticker.stop();
        self.message = Message::Paused;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), TimerError> {
        let remaining = {
            let mut timer = self.timer();
            timer.resume()?;
            timer.remaining()
        };
        self.message = running_message(remaining);
        self.spawn_ticker();
        Ok(())
    }

    fn spawn_ticker(&mut self) {
        self.ticker.start(Arc::clone(&self.timer), self.notify.clone());
    }

    /// Lock the timer. A poisoned lock still holds consistent counters.
    fn timer(&self) -> MutexGuard<'_, Timer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Status line for a running countdown with `remaining` seconds left.
fn running_message(remaining: u32) -> Message {
    if is_urgent(remaining) {
        Message::Hurry(remaining)
    } else {
        Message::Running
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    const FAST: Duration = Duration::from_millis(5);
    const WAIT: Duration = Duration::from_secs(5);

    type TestApp = App<mpsc::Sender<TimerEvent>>;

    fn app(fields: Fields) -> (TestApp, mpsc::Receiver<TimerEvent>) {
        app_with_interval(fields, FAST)
    }

    fn app_with_interval(
        fields: Fields,
        interval: Duration,
    ) -> (TestApp, mpsc::Receiver<TimerEvent>) {
        let (tx, rx) = mpsc::channel();
        (App::new(fields, 10, interval, tx), rx)
    }

    /// Feed ticker events back into the app until it finishes, as the event
    /// loop does.
    fn drain(app: &mut TestApp, rx: &mpsc::Receiver<TimerEvent>) -> Vec<Alert> {
        let mut alerts = Vec::new();
        while let Ok(event) = rx.recv_timeout(WAIT) {
            let finished = event.is_finished();
            alerts.extend(app.handle_timer_event(event));
            if finished {
                break;
            }
        }
        alerts
    }

    #[test]
    fn test_start_without_time_alerts() {
        let (mut app, _rx) = app(Fields::default());

        assert_eq!(app.toggle(), Some(Alert::NoTimeSet));
        assert_eq!(
            app.snapshot(),
            Snapshot {
                status: Status::Idle,
                remaining: 0,
                total: 0
            }
        );
        assert_eq!(app.message(), Message::Prompt);
        assert_eq!(app.action_label(), "Start");
    }

    #[test]
    fn test_empty_field_alerts() {
        let mut fields = Fields::default();
        fields.backspace();
        fields.backspace();
        let (mut app, _rx) = app(fields);

        assert_eq!(app.toggle(), Some(Alert::NoTimeSet));
    }

    #[test]
    fn test_counts_down_to_completion() {
        let (mut app, rx) = app(Fields::new(0, 0, 5));

        assert_eq!(app.toggle(), None);
        assert_eq!(app.message(), Message::Hurry(5));
        assert_eq!(app.action_label(), "Pause");

        let alerts = drain(&mut app, &rx);

        assert_eq!(alerts, vec![Alert::Completed]);
        assert_eq!(
            app.snapshot(),
            Snapshot {
                status: Status::Finished,
                remaining: 0,
                total: 5
            }
        );
        assert_eq!(app.message(), Message::Completed);
        assert_eq!(app.action_label(), "Start");
        assert_eq!(app.view().active_segments(), 0);
        assert!(!app.view().urgent());
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut app, rx) = app(Fields::new(0, 10, 0));
        app.toggle();
        rx.recv_timeout(WAIT).unwrap();

        app.toggle();
        assert_eq!(app.snapshot().status, Status::Paused);
        assert_eq!(app.message(), Message::Paused);
        assert_eq!(app.action_label(), "Resume");

        let paused = app.snapshot().remaining;
        std::thread::sleep(FAST * 10);
        assert_eq!(app.snapshot().remaining, paused);

        // Drop whatever was posted before the pause.
        while rx.try_recv().is_ok() {}

        app.toggle();
        assert_eq!(app.snapshot().status, Status::Running);
        match rx.recv_timeout(WAIT).unwrap() {
            TimerEvent::Tick {
                run,
                remaining,
                total,
            } => {
                assert_eq!(run, 1);
                assert_eq!(remaining, paused - 1);
                assert_eq!(total, 600);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        app.shutdown();
    }

    #[test]
    fn test_hurry_message() {
        // Slow ticker, the events below are fed in by hand.
        let (mut app, _rx) = app_with_interval(Fields::new(0, 0, 12), Duration::from_secs(60));
        app.toggle();

        app.handle_timer_event(TimerEvent::Tick {
            run: 1,
            remaining: 11,
            total: 12,
        });
        assert_eq!(app.message(), Message::Running);

        app.handle_timer_event(TimerEvent::Tick {
            run: 1,
            remaining: 10,
            total: 12,
        });
        assert_eq!(app.message(), Message::Hurry(10));
        assert_eq!(app.message().to_string(), "Hurry! 10s left");

        app.shutdown();
    }

    #[test]
    fn test_short_start_is_urgent() {
        let (mut app, _rx) = app_with_interval(Fields::new(0, 0, 5), Duration::from_secs(60));

        app.toggle();
        assert_eq!(app.message(), Message::Hurry(5));

        app.toggle();
        assert_eq!(app.message(), Message::Paused);

        app.toggle();
        assert_eq!(app.message(), Message::Hurry(5));
        app.shutdown();
    }

    #[test]
    fn test_earlier_run_completion_still_alerts() {
        let (mut app, rx) = app(Fields::new(0, 0, 1));
        app.toggle();

        // Wait until the run has finished without handling its event yet.
        let finished = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(finished, TimerEvent::Finished { run: 1 });

        // Start a second, longer run before the event loop gets to it.
        app.fields_mut().focus_next();
        app.fields_mut().push_digit('5');
        assert_eq!(app.toggle(), None);
        assert_eq!(app.snapshot().total, 301);

        assert_eq!(app.handle_timer_event(finished), Some(Alert::Completed));
        assert_eq!(app.message(), Message::Running);
        assert_eq!(app.snapshot().status, Status::Running);
        app.shutdown();
    }

    #[test]
    fn test_stale_finish_is_ignored() {
        let (mut app, _rx) = app_with_interval(Fields::new(0, 0, 12), Duration::from_secs(60));
        app.toggle();
        app.reset();

        // The first run gets id 1.
        assert_eq!(app.handle_timer_event(TimerEvent::Finished { run: 1 }), None);
        assert_eq!(app.message(), Message::Prompt);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut app, _rx) = app(Fields::new(1, 2, 3));
        app.toggle();
        app.reset();

        assert_eq!(
            app.snapshot(),
            Snapshot {
                status: Status::Idle,
                remaining: 0,
                total: 0
            }
        );
        assert_eq!(app.fields(), &Fields::default());
        assert_eq!(app.message(), Message::Prompt);
        assert_eq!(app.view().active_segments(), 0);
    }

    #[test]
    fn test_restart_after_completion() {
        let (mut app, rx) = app(Fields::new(0, 0, 1));
        app.toggle();
        assert_eq!(drain(&mut app, &rx), vec![Alert::Completed]);

        app.fields_mut().clear();
        app.fields_mut().focus_prev();
        app.fields_mut().push_digit('3');
        assert_eq!(app.toggle(), None);
        assert_eq!(app.snapshot().total, 3);
        assert_eq!(app.message(), Message::Hurry(3));
        app.shutdown();
    }

    #[test]
    fn test_view_segments() {
        let fields = Fields::default();
        let view = View {
            fields: &fields,
            timer: Snapshot {
                status: Status::Running,
                remaining: 30,
                total: 120,
            },
            message: Message::Running,
            segments: 10,
        };

        assert_eq!(view.active_segments(), 3);
        assert!(!view.urgent());
    }

    #[test]
    fn test_title() {
        let (app, _rx) = app(Fields::default());
        assert_eq!(
            app.title(),
            "Countdown Timer - Set a time and press Start [Space: Start, R: Reset]"
        );
    }
}
