//! Pose frame sources.
//!
//! The frame loop only sees [`PoseSnapshot`]s arriving on a channel; it
//! does not care whether they come from a recording or a script.  A
//! source ends its stream by returning, which drops the sender.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use dance_gesture::{samples, GestureName, BABY_SHARK, DISCO, THRILLER, YMCA};
use pose_stream::PoseSnapshot;

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver pose frames over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<PoseSnapshot>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<F: FrameSource>(source: F) -> Receiver<PoseSnapshot> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource — JSON lines
// ════════════════════════════════════════════════════════════════════════════

/// Replays recorded poses, one JSON object per line.
///
/// Blank lines and lines starting with `#` are skipped.  A malformed line
/// is logged and skipped; the stream goes on.
pub struct ReplaySource {
    reader:   Box<dyn BufRead + Send>,
    interval: Duration,
}

impl ReplaySource {
    pub fn open(path: &Path, interval: Duration) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), interval))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R, interval: Duration) -> Self {
        ReplaySource { reader: Box::new(reader), interval }
    }
}

impl FrameSource for ReplaySource {
    fn run(self: Box<Self>, tx: Sender<PoseSnapshot>) {
        let ReplaySource { reader, interval } = *self;
        for (index, line) in reader.lines().enumerate() {
            let lineno = index + 1;
            let line = match line {
                Ok(l)  => l,
                Err(e) => {
                    warn!(line = lineno, error = %e, "replay read failed; stopping");
                    return;
                }
            };
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            match PoseSnapshot::from_json(text) {
                Ok(pose) => {
                    if tx.send(pose).is_err() {
                        return;
                    }
                    if !interval.is_zero() {
                        thread::sleep(interval);
                    }
                }
                Err(e) => warn!(line = lineno, error = %e, "skipping malformed pose"),
            }
        }
        debug!("replay finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource — synthetic demo poses
// ════════════════════════════════════════════════════════════════════════════

/// One step of a script: hold `gesture` (or a neutral pose) for `frames`
/// frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub gesture: Option<GestureName>,
    pub frames:  u32,
}

impl Step {
    pub const fn hold(gesture: GestureName, frames: u32) -> Self {
        Step { gesture: Some(gesture), frames }
    }

    pub const fn rest(frames: u32) -> Self {
        Step { gesture: None, frames }
    }
}

/// Plays a fixed script of sample poses.
pub struct ScriptedSource {
    steps:    Vec<Step>,
    interval: Duration,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>, interval: Duration) -> Self {
        ScriptedSource { steps, interval }
    }

    /// Every catalog move once, with rests in between and a brief
    /// flicker of Disco inside the Thriller hold.
    pub fn demo(interval: Duration) -> Self {
        Self::new(
            vec![
                Step::rest(10),
                Step::hold(YMCA, 30),
                Step::rest(10),
                Step::hold(BABY_SHARK, 30),
                Step::hold(DISCO, 30),
                Step::hold(THRILLER, 15),
                Step::hold(DISCO, 1),
                Step::hold(THRILLER, 15),
                Step::rest(10),
            ],
            interval,
        )
    }

    /// Total number of frames the script emits.
    pub fn frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }
}

impl FrameSource for ScriptedSource {
    fn run(self: Box<Self>, tx: Sender<PoseSnapshot>) {
        for step in &self.steps {
            let pose = match samples::pose_for(step.gesture) {
                Ok(p)  => p,
                Err(e) => {
                    warn!(error = %e, "cannot build sample pose");
                    continue;
                }
            };
            for _ in 0..step.frames {
                if tx.send(pose.clone()).is_err() {
                    return;
                }
                if !self.interval.is_zero() {
                    thread::sleep(self.interval);
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
