use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::engine::SpeechEngine;
use crate::error::SpeechError;

/// Identifies one `speak` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeechHandle(Uuid);

impl SpeechHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// How an utterance ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Completed,
    Failed(String),
}

/// Lifecycle events of a speech request, in request order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Fired immediately before the engine call
    Started(SpeechHandle),
    /// Fired immediately after the engine call returns, success or not
    Finished {
        handle: SpeechHandle,
        outcome: SpeechOutcome,
    },
}

struct SpeechJob {
    handle: SpeechHandle,
    text: String,
}

/// Runs a [`SpeechEngine`] on a dedicated worker thread.
///
/// Requests are queued and spoken one after another; each one yields exactly
/// one `Started` and one `Finished`. Events are never delivered by callback:
/// the owning tick loop drains them with [`poll_events`](Self::poll_events),
/// so nothing on the worker touches tick-thread state.
pub struct SpeechSynthesisBridge {
    jobs: Option<mpsc::Sender<SpeechJob>>,
    events: mpsc::Receiver<SpeechEvent>,
    worker: Option<thread::JoinHandle<()>>,
    /// Requests queued or speaking, as last seen by the tick thread
    in_flight: usize,
}

impl SpeechSynthesisBridge {
    /// Spawn the worker thread that will own `engine`
    pub fn new(engine: impl SpeechEngine) -> Result<Self, SpeechError> {
        let (job_tx, job_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("speech-worker".into())
            .spawn(move || run_worker(engine, job_rx, event_tx))
            .map_err(SpeechError::Spawn)?;

        Ok(Self {
            jobs: Some(job_tx),
            events: event_rx,
            worker: Some(worker),
            in_flight: 0,
        })
    }

    /// Queue `text` for speaking. Never blocks on the engine.
    pub fn speak(&mut self, text: impl Into<String>) -> Result<SpeechHandle, SpeechError> {
        let jobs = self.jobs.as_ref().ok_or(SpeechError::WorkerUnavailable)?;
        let handle = SpeechHandle::new();
        jobs.send(SpeechJob {
            handle,
            text: text.into(),
        })
        .map_err(|_| SpeechError::WorkerUnavailable)?;

        self.in_flight += 1;
        debug!("Queued speech request {}", handle.id());
        Ok(handle)
    }

    /// Non-blocking: take the next event if one is ready
    pub fn try_recv(&mut self) -> Option<SpeechEvent> {
        let event = self.events.try_recv().ok()?;
        self.track(&event);
        Some(event)
    }

    /// Drain every event that is ready, in order
    pub fn poll_events(&mut self) -> Vec<SpeechEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Blocking wait for the next event, up to `timeout`. Not for use on the
    /// tick thread during normal operation.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<SpeechEvent> {
        let event = self.events.recv_timeout(timeout).ok()?;
        self.track(&event);
        Some(event)
    }

    /// Number of requests queued or speaking
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Whether any request is still queued or speaking
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn track(&mut self, event: &SpeechEvent) {
        if let SpeechEvent::Finished { .. } = event {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }
}

impl Drop for SpeechSynthesisBridge {
    /// Closes the queue and waits for the worker to finish what it has
    fn drop(&mut self) {
        self.jobs = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Speech worker panicked");
            }
        }
    }
}

fn run_worker<E: SpeechEngine>(
    mut engine: E,
    jobs: mpsc::Receiver<SpeechJob>,
    events: mpsc::Sender<SpeechEvent>,
) {
    debug!("Speech worker started");

    for job in jobs {
        if events.send(SpeechEvent::Started(job.handle)).is_err() {
            break;
        }

        let outcome = match engine.say(&job.text) {
            Ok(()) => SpeechOutcome::Completed,
            Err(e) => {
                warn!("Speech request {} failed: {}", job.handle.id(), e);
                SpeechOutcome::Failed(e.to_string())
            }
        };

        let finished = SpeechEvent::Finished {
            handle: job.handle,
            outcome,
        };
        if events.send(finished).is_err() {
            break;
        }
    }

    debug!("Speech worker stopped");
}
