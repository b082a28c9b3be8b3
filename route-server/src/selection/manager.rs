//! Session task owning one [`SelectionState`].
//!
//! Handles talk to the task over an `mpsc` channel; each input command is
//! answered with the snapshot it produced. Readers can also watch
//! snapshots as they are published. Fetches run in a [`Debouncer`] slot and
//! report back to the task through a weak sender, so a session whose
//! handles are all gone shuts down even with a fetch in flight.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::domain::{Criterion, EvaluatedRoute, GeoPoint, TransportMode};
use crate::engine::Evaluate;
use crate::providers::FetchError;

use super::debounce::Debouncer;
use super::error::SelectionError;
use super::state::{Applied, Effect, FetchRequest, SelectionState, Snapshot};

const COMMAND_BUFFER: usize = 32;

enum Command {
    SetEndpoints {
        origin: Option<GeoPoint>,
        destination: Option<GeoPoint>,
        reply: oneshot::Sender<Snapshot>,
    },
    SetMode {
        mode: TransportMode,
        reply: oneshot::Sender<Snapshot>,
    },
    SetCriterion {
        criterion: Criterion,
        reply: oneshot::Sender<Snapshot>,
    },
    Select {
        id: String,
        reply: oneshot::Sender<Result<Snapshot, SelectionError>>,
    },
    Completed {
        generation: u64,
        result: Result<Vec<EvaluatedRoute>, FetchError>,
    },
}

/// Cloneable handle to a selection session.
#[derive(Clone)]
pub struct SelectionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SelectionHandle {
    /// Start a session task evaluating with `engine`.
    pub fn spawn<E: Evaluate>(engine: Arc<E>) -> Self {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let state = SelectionState::default();
        let (publisher, snapshots) = watch::channel(state.snapshot());

        let session = Session {
            debouncer: Debouncer::new(engine.config().debounce),
            engine,
            state,
            publisher,
            commands: commands.downgrade(),
        };
        tokio::spawn(session.run(receiver));

        Self {
            commands,
            snapshots,
        }
    }

    pub async fn set_endpoints(
        &self,
        origin: Option<GeoPoint>,
        destination: Option<GeoPoint>,
    ) -> Result<Snapshot, SelectionError> {
        self.request(|reply| Command::SetEndpoints {
            origin,
            destination,
            reply,
        })
        .await
    }

    pub async fn set_mode(&self, mode: TransportMode) -> Result<Snapshot, SelectionError> {
        self.request(|reply| Command::SetMode { mode, reply }).await
    }

    pub async fn set_criterion(&self, criterion: Criterion) -> Result<Snapshot, SelectionError> {
        self.request(|reply| Command::SetCriterion { criterion, reply })
            .await
    }

    /// Select a candidate of the current set.
    pub async fn select(&self, id: impl Into<String>) -> Result<Snapshot, SelectionError> {
        let id = id.into();
        self.request(|reply| Command::Select { id, reply }).await?
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Wait until no fetch is pending.
    pub async fn settled(&self) -> Result<Snapshot, SelectionError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|s| !s.pending)
            .await
            .map_err(|_| SelectionError::Closed)?;
        Ok(snapshot.clone())
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SelectionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SelectionError::Closed)?;
        response.await.map_err(|_| SelectionError::Closed)
    }
}

struct Session<E> {
    engine: Arc<E>,
    state: SelectionState,
    debouncer: Debouncer,
    publisher: watch::Sender<Snapshot>,
    commands: mpsc::WeakSender<Command>,
}

impl<E: Evaluate> Session<E> {
    async fn run(mut self, mut receiver: mpsc::Receiver<Command>) {
        while let Some(command) = receiver.recv().await {
            self.handle(command);
        }
        debug!("selection session closed");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SetEndpoints {
                origin,
                destination,
                reply,
            } => {
                let effect = self.state.set_endpoints(origin, destination);
                self.run_effect(effect);
                let _ = reply.send(self.publish());
            }
            Command::SetMode { mode, reply } => {
                let effect = self.state.set_mode(mode);
                self.run_effect(effect);
                let _ = reply.send(self.publish());
            }
            Command::SetCriterion { criterion, reply } => {
                let effect = self.state.set_criterion(criterion);
                self.run_effect(effect);
                let _ = reply.send(self.publish());
            }
            Command::Select { id, reply } => {
                let result = self.state.select(&id).map(|()| self.publish());
                let _ = reply.send(result);
            }
            Command::Completed { generation, result } => {
                match self.state.apply(generation, result) {
                    Applied::Stale => debug!(generation, "discarding stale result"),
                    applied => {
                        debug!(generation, ?applied, "applied fetch result");
                        self.publish();
                    }
                }
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Cancel => self.debouncer.cancel(),
            Effect::Fetch(request) => self.schedule(request),
        }
    }

    fn schedule(&mut self, request: FetchRequest) {
        let FetchRequest {
            generation,
            origin,
            destination,
            mode,
            criterion,
        } = request;

        let engine = Arc::clone(&self.engine);
        let commands = self.commands.clone();
        let query = engine.query(origin, destination, mode, criterion);
        debug!(generation, %origin, %destination, "scheduling fetch");

        self.debouncer.schedule(async move {
            let result = engine.evaluate(&query).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Completed { generation, result }).await;
            }
        });
    }

    fn publish(&self) -> Snapshot {
        let snapshot = self.state.snapshot();
        self.publisher.send_replace(snapshot.clone());
        snapshot
    }
}
