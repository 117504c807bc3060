//! Background execution of persist and refresh calls.
//!
//! Each call runs on its own thread and reports back over an mpsc channel.
//! The UI loop drains completions between input events, so the board itself
//! is only ever touched from one thread. Calls are independent: there is no
//! queue, no ordering between them and no cancellation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::state::PersistRequest;
use crate::api::Backend;
use crate::error::ApiError;
use crate::models::{Deal, Stage};

/// Stages and deals as fetched together from the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub stages: Vec<Stage>,
    pub deals: Vec<Deal>,
}

/// Fetch stages and deals for `owner`.
pub fn fetch_snapshot(backend: &dyn Backend, owner: &str) -> Result<Snapshot, ApiError> {
    let stages = backend.list_stages(owner)?;
    let deals = backend.list_deals(owner)?;
    Ok(Snapshot { stages, deals })
}

/// A finished background call.
#[derive(Debug)]
pub enum Completion {
    Persisted {
        ticket: u64,
        deal_id: String,
        result: Result<(), ApiError>,
    },
    Refreshed(Result<Snapshot, ApiError>),
}

/// Runs backend calls off the UI thread.
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    owner: String,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: Arc<AtomicUsize>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, owner: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            owner: owner.into(),
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Calls started but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Persist an optimistic move in the background.
    pub fn persist(&self, request: PersistRequest) {
        debug!(deal_id = %request.deal_id, ticket = request.ticket, "dispatching persist");
        self.spawn(move |backend, _owner| {
            let result = backend.update_deal(&request.deal_id, &request.update);
            Completion::Persisted {
                ticket: request.ticket,
                deal_id: request.deal_id,
                result,
            }
        });
    }

    /// Re-fetch stages and deals in the background.
    pub fn refresh(&self) {
        debug!(owner = %self.owner, "dispatching refresh");
        self.spawn(|backend, owner| Completion::Refreshed(fetch_snapshot(backend, owner)));
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn Backend, &str) -> Completion + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let owner = self.owner.clone();
        let tx = self.tx.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        thread::spawn(move || {
            let completion = job(backend.as_ref(), &owner);
            if tx.send(completion).is_err() {
                warn!("board dropped before a background call finished");
            }
        });
    }

    /// Next finished call, if any, without blocking.
    pub fn try_next(&self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Some(completion)
    }

    /// Wait up to `timeout` for the next finished call.
    pub fn wait_next(&self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Some(completion)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
