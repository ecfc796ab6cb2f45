//! Terminal input and refresh scheduling for the TUI.
//!
//! A background thread polls crossterm and also owns the reload timer, so the
//! main loop only reacts to [`Event`]s.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events.
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    /// Poll timeout with nothing to report.
    Tick,
    /// The refresh interval elapsed; fetch a new record snapshot.
    Refresh,
    /// Key press.
    Key(KeyEvent),
    /// Terminal resized; the next draw picks up the new size.
    Redraw,
}

/// Polls the terminal in a separate thread and forwards [`Event`]s.
pub struct EventHandler {
    rx: Receiver<Event>,
    /// Kept alive to prevent channel closure.
    _tx: Sender<Event>,
}

impl EventHandler {
    /// Starts polling every `tick_rate`; emits [`Event::Refresh`] every
    /// `refresh_every` when set.
    pub fn new(tick_rate: Duration, refresh_every: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::spawn(move || {
            let mut timer = RefreshTimer::new(refresh_every, Instant::now());
            loop {
                if timer.due(Instant::now()) && event_tx.send(Event::Refresh).is_err() {
                    break;
                }
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read().ok().and_then(translate) {
                        Some(event) => event,
                        None => continue,
                    }
                } else {
                    Event::Tick
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

/// Fires once per elapsed refresh interval.
struct RefreshTimer {
    every: Option<Duration>,
    last: Instant,
}

impl RefreshTimer {
    fn new(every: Option<Duration>, now: Instant) -> Self {
        Self { every, last: now }
    }

    fn due(&mut self, now: Instant) -> bool {
        match self.every {
            Some(every) if now.saturating_duration_since(self.last) >= every => {
                self.last = now;
                true
            }
            _ => false,
        }
    }
}

/// Key releases and repeats are dropped so each press acts once.
fn translate(evt: CrosstermEvent) -> Option<Event> {
    match evt {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(..) => Some(Event::Redraw),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn timer_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = RefreshTimer::new(Some(Duration::from_secs(5)), start);
        assert!(!timer.due(start + Duration::from_secs(4)));
        assert!(timer.due(start + Duration::from_secs(5)));
        assert!(!timer.due(start + Duration::from_secs(6)));
        assert!(timer.due(start + Duration::from_secs(10)));
    }

    #[test]
    fn timer_without_interval_never_fires() {
        let start = Instant::now();
        let mut timer = RefreshTimer::new(None, start);
        assert!(!timer.due(start + Duration::from_secs(3600)));
    }

    #[test]
    fn only_key_presses_pass() {
        let press = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(
            translate(CrosstermEvent::Key(press)),
            Some(Event::Key(press))
        );

        let release = KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate(CrosstermEvent::Key(release)), None);
        assert_eq!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Redraw));
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
    }
}
