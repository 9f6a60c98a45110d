//! Recording playback backend for tests.
//!
//! Available inside this crate's tests and, for downstream crates, behind
//! the `testing` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::service::{PlaybackError, PlaybackService};

/// One request seen by the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Play { track: String, offset_ms: u64 },
    Seek { offset_ms: u64 },
}

/// Scripted failure for an upcoming call.
#[derive(Clone, Copy, Debug)]
pub enum Failure {
    AuthExpired,
    Status(u16),
}

impl Failure {
    fn into_error(self) -> PlaybackError {
        match self {
            Failure::AuthExpired => PlaybackError::AuthExpired,
            Failure::Status(code) => PlaybackError::Status { code, body: "scripted".into() },
        }
    }
}

#[derive(Default)]
struct Shared {
    calls:         Mutex<Vec<Call>>,
    script:        Mutex<VecDeque<Option<Failure>>>,
    gated:         bool,
    gate_open:     Mutex<bool>,
    gate_cv:       Condvar,
    in_flight:     AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Records every call; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingService {
    shared: Arc<Shared>,
}

impl RecordingService {
    pub fn new() -> Self { Self::default() }

    /// A service whose calls block (after being recorded) until
    /// [`RecordingService::open_gate`] is called.
    pub fn gated() -> Self {
        RecordingService {
            shared: Arc::new(Shared { gated: true, ..Default::default() }),
        }
    }

    pub fn open_gate(&self) {
        *self.shared.gate_open.lock().unwrap() = true;
        self.shared.gate_cv.notify_all();
    }

    /// Make the next call fail.
    pub fn fail_next(&self, failure: Failure) {
        self.shared.script.lock().unwrap().push_back(Some(failure));
    }

    /// Let `n` calls succeed, then fail the one after.
    pub fn fail_after(&self, n: usize, failure: Failure) {
        let mut script = self.shared.script.lock().unwrap();
        script.extend(std::iter::repeat(None).take(n));
        script.push_back(Some(failure));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }

    /// Highest number of calls observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }

    /// Poll until at least `n` calls were recorded or `timeout` passes.
    pub fn wait_for_calls(&self, n: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.shared.calls.lock().unwrap().len() >= n {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        self.shared.calls.lock().unwrap().len() >= n
    }

    fn record(&self, call: Call) -> Result<(), PlaybackError> {
        let now = self.shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.shared.calls.lock().unwrap().push(call);

        if self.shared.gated {
            let mut open = self.shared.gate_open.lock().unwrap();
            while !*open {
                open = self.shared.gate_cv.wait(open).unwrap();
            }
        }

        let scripted = self.shared.script.lock().unwrap().pop_front().flatten();
        self.shared.in_flight.fetch_sub(1, Ordering::SeqCst);
        match scripted {
            Some(f) => Err(f.into_error()),
            None    => Ok(()),
        }
    }
}

impl PlaybackService for RecordingService {
    fn play(&mut self, track: &str, offset_ms: u64) -> Result<(), PlaybackError> {
        self.record(Call::Play { track: track.to_string(), offset_ms })
    }

    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        self.record(Call::Seek { offset_ms })
    }

    fn name(&self) -> &'static str { "recording" }
}

/// A service whose every call panics, standing in for a backend bug.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanickingService;

impl PlaybackService for PanickingService {
    fn play(&mut self, track: &str, _offset_ms: u64) -> Result<(), PlaybackError> {
        panic!("backend crashed while playing {}", track);
    }

    fn seek(&mut self, _offset_ms: u64) -> Result<(), PlaybackError> {
        panic!("backend crashed while seeking");
    }

    fn name(&self) -> &'static str { "panicking" }
}
