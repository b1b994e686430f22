//! Debounced persistence trigger.
//!
//! The document owns exactly one `Autosave` for its whole lifetime. Rapid
//! successive edits coalesce into at most one save per window: the first
//! edit fires immediately, later edits inside the window only mark the
//! state dirty, and `flush_due` fires the trailing save once the window
//! has passed.

use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_SAVE_WINDOW: Duration = Duration::from_millis(100);

/// Receiver of document snapshots. Saving is best-effort and asynchronous
/// from the engine's point of view; errors are logged and dropped.
pub trait SaveSink {
    fn save(&mut self, snapshot: &str) -> anyhow::Result<()>;
}

impl<F> SaveSink for F
where
    F: FnMut(&str) -> anyhow::Result<()>,
{
    fn save(&mut self, snapshot: &str) -> anyhow::Result<()> {
        self(snapshot)
    }
}

pub struct Autosave {
    window: Duration,
    last_fired: Option<Instant>,
    pending: bool,
    sink: Option<Box<dyn SaveSink>>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_WINDOW)
    }
}

impl fmt::Debug for Autosave {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Autosave")
            .field("window", &self.window)
            .field("pending", &self.pending)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Autosave {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
            pending: false,
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn SaveSink>) {
        self.sink = Some(sink);
    }

    #[inline(always)]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    #[inline(always)]
    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// A mutation asks for a save. Returns whether the caller should save
    /// right now; otherwise the request is held until the window reopens.
    pub(crate) fn request(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(fired) if now.duration_since(fired) < self.window => {
                self.pending = true;
                false
            }
            _ => {
                self.last_fired = Some(now);
                self.pending = false;
                true
            }
        }
    }

    /// Trailing-edge poll: fire the held request once the window has passed.
    pub(crate) fn flush_due(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        let due = self
            .last_fired
            .is_none_or(|fired| now.duration_since(fired) >= self.window);
        if due {
            self.last_fired = Some(now);
            self.pending = false;
        }
        due
    }

    pub(crate) fn deliver(&mut self, snapshot: &str) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.save(snapshot) {
                log::warn!("autosave failed: {err}");
            }
        }
    }
}
