//! Serialized playback thread.
//!
//! Cues are handed to a single worker through a one-slot mailbox.  While a
//! cue is in flight, a newly submitted cue waits in the slot; submitting
//! again replaces it, so only the latest gesture is played once the
//! in-flight call settles.  Results come back over a channel so the
//! frame loop can drain them without blocking.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use crate::trigger::{CueOutcome, PlaybackTrigger, TriggerError};

// ════════════════════════════════════════════════════════════════════════════
// CueReport — sent back to the frame loop
// ════════════════════════════════════════════════════════════════════════════

/// Outcome of one cue, in the order cues were issued.
#[derive(Debug)]
pub struct CueReport {
    pub gesture: String,
    pub result:  Result<CueOutcome, TriggerError>,
}

// ════════════════════════════════════════════════════════════════════════════
// Mailbox
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Mailbox {
    pending: Option<String>,
    closed:  bool,
}

#[derive(Default)]
struct Shared {
    mailbox: Mutex<Mailbox>,
    ready:   Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Mailbox> {
        self.mailbox.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Player — handle to the playback thread
// ════════════════════════════════════════════════════════════════════════════

pub struct Player {
    shared:    Arc<Shared>,
    report_rx: Receiver<CueReport>,
    worker:    Option<JoinHandle<()>>,
}

impl Player {
    /// Spawn the playback thread.  `trigger` is owned by the thread.
    pub fn spawn(trigger: PlaybackTrigger) -> Self {
        let shared = Arc::new(Shared::default());
        let (report_tx, report_rx) = mpsc::channel::<CueReport>();

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || player_thread(trigger, worker_shared, report_tx));

        Player { shared, report_rx, worker: Some(worker) }
    }

    /// Queue a cue for `gesture`.  Returns the gesture it displaced, if an
    /// older cue was still waiting.
    pub fn submit(&self, gesture: &str) -> Option<String> {
        if !self.is_running() {
            warn!(gesture, "playback thread has stopped; cue will not be played");
        }
        let replaced = self.shared.lock().pending.replace(gesture.to_string());
        self.shared.ready.notify_one();
        if let Some(old) = &replaced {
            debug!(stale = %old, latest = gesture, "coalesced pending cue");
        }
        replaced
    }

    /// Whether the playback thread is still alive.  It only stops on
    /// shutdown or after a panic inside a backend.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// The cue waiting behind the in-flight one, if any.
    pub fn pending(&self) -> Option<String> {
        self.shared.lock().pending.clone()
    }

    /// Drain finished cue reports (non-blocking).
    pub fn drain_reports(&self) -> Vec<CueReport> {
        self.report_rx.try_iter().collect()
    }

    /// Stop the thread.  A cue already in flight runs to completion; a
    /// waiting cue is abandoned.  Returns the reports not yet drained.
    pub fn shutdown(mut self) -> Vec<CueReport> {
        self.shared.close();
        if let Some(worker) = self.worker.take() {
            if let Err(panic) = worker.join() {
                error!(reason = panic_message(&*panic), "playback thread panicked");
            }
        }
        self.drain_reports()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // Detach rather than join: the in-flight call still settles.
        self.shared.close();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

// ════════════════════════════════════════════════════════════════════════════
// player_thread — the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn player_thread(mut trigger: PlaybackTrigger, shared: Arc<Shared>, report_tx: Sender<CueReport>) {
    loop {
        let gesture = {
            let mut mailbox = shared.lock();
            loop {
                if mailbox.closed {
                    if let Some(g) = mailbox.pending.take() {
                        debug!(gesture = %g, "abandoning pending cue at shutdown");
                    }
                    return;
                }
                if let Some(g) = mailbox.pending.take() {
                    break g;
                }
                mailbox = shared.ready.wait(mailbox).unwrap_or_else(|e| e.into_inner());
            }
        };

        let result = trigger.fire(&gesture);
        if report_tx.send(CueReport { gesture, result }).is_err() {
            return;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
