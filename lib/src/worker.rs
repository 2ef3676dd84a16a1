//! A background thread that owns a `Session` and fills on request, so a host
//! can stay responsive and change parameters while a fill is running.

use crate::{
    progress::{CancelToken, ProgressStat},
    session::{FilledImage, Parameters, RunOutcome, Session},
    Error, ImageSource, Selection,
};
use log::debug;
use std::{
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread::JoinHandle,
};

/// Identifies a request made with `FillWorker::submit`
pub type RunId = u64;

pub enum WorkerEvent {
    Progress { id: RunId, stat: ProgressStat },
    Filled { id: RunId, image: FilledImage },
    /// The run was canceled, or replaced by a newer one before it started
    Canceled { id: RunId },
    Failed { id: RunId, error: Error },
}

impl WorkerEvent {
    pub fn id(&self) -> RunId {
        match self {
            Self::Progress { id, .. }
            | Self::Filled { id, .. }
            | Self::Canceled { id }
            | Self::Failed { id, .. } => *id,
        }
    }

    /// Whether this is the last event for its run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

enum Request {
    Run {
        id: RunId,
        params: Parameters,
        cancel: CancelToken,
    },
    Shutdown,
}

/// Runs fills on a dedicated thread. Submitting new parameters cancels the
/// run in flight, requests that pile up while a run winds down collapse into
/// the newest one.
pub struct FillWorker {
    requests: Sender<Request>,
    events: Receiver<WorkerEvent>,
    current: CancelToken,
    next_id: RunId,
    thread: Option<JoinHandle<()>>,
}

impl FillWorker {
    /// Loads the image and starts the worker thread, no fill is run until
    /// `submit` is called
    pub fn spawn<'a, I: Into<ImageSource<'a>>>(
        image: I,
        selection: Selection,
        params: Parameters,
    ) -> Result<Self, Error> {
        let session = Session::builder().parameters(params).build(image, selection)?;

        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("fill-worker".to_owned())
            .spawn(move || worker_loop(session, request_rx, event_tx))?;

        Ok(Self {
            requests: request_tx,
            events: event_rx,
            current: CancelToken::new(),
            next_id: 0,
            thread: Some(thread),
        })
    }

    /// Queues a fill with `params`, canceling the current one
    pub fn submit(&mut self, params: Parameters) -> Result<RunId, Error> {
        self.current.cancel();
        self.current = CancelToken::new();

        let id = self.next_id;
        self.next_id += 1;

        self.requests
            .send(Request::Run {
                id,
                params,
                cancel: self.current.clone(),
            })
            .map_err(|_| Error::WorkerDisconnected)?;

        Ok(id)
    }

    /// Cancels the latest submitted run
    pub fn cancel(&self) {
        self.current.cancel();
    }

    /// Blocks until the worker has something to report
    pub fn recv(&self) -> Result<WorkerEvent, Error> {
        self.events.recv().map_err(|_| Error::WorkerDisconnected)
    }

    pub fn try_recv(&self) -> Result<Option<WorkerEvent>, Error> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::WorkerDisconnected),
        }
    }
}

impl Drop for FillWorker {
    fn drop(&mut self) {
        self.current.cancel();
        let _ = self.requests.send(Request::Shutdown);

        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop(mut session: Session, requests: Receiver<Request>, events: Sender<WorkerEvent>) {
    while let Ok(mut request) = requests.recv() {
        // Every queued request was canceled by the one after it
        while let Ok(newer) = requests.try_recv() {
            if let Request::Run { id, .. } = request {
                let _ = events.send(WorkerEvent::Canceled { id });
            }
            request = newer;
        }

        let (id, params, cancel) = match request {
            Request::Run { id, params, cancel } => (id, params, cancel),
            Request::Shutdown => break,
        };

        debug!("worker starting run {}", id);
        session.set_parameters(params);

        let progress_tx = events.clone();
        let mut on_progress = move |stat: ProgressStat| {
            let _ = progress_tx.send(WorkerEvent::Progress { id, stat });
        };

        let event = match session.run(Some(&mut on_progress), &cancel) {
            Ok(RunOutcome::Filled(image)) => WorkerEvent::Filled { id, image },
            Ok(RunOutcome::Canceled) => WorkerEvent::Canceled { id },
            Err(error) => WorkerEvent::Failed { id, error },
        };

        if events.send(event).is_err() {
            break;
        }
    }

    debug!("worker shutting down");
}
