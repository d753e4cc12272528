//! The session task: one owner for the grid, one queue for everything that mutates it.

use std::future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};

use tetris_grid_core::best_score::BestScoreStore;
use tetris_grid_core::{GameController, Grid, GridError, GridSnapshot};
use tetris_grid_types::{GameAction, Notification};

use crate::SessionError;

/// Commands the session accepts, applied in arrival order
#[derive(Debug)]
pub enum Command {
    /// Start the gravity clock (idempotent)
    Start,
    /// Apply a player intent
    Action(GameAction),
    Pause,
    Resume,
    /// Fresh session on the same grid; persists the best score if it was beaten
    Reset,
    /// Reply with a snapshot taken after every earlier command
    Snapshot(oneshot::Sender<GridSnapshot>),
    /// Persist the best score and stop the task
    Shutdown,
}

const COMMAND_QUEUE_DEPTH: usize = 64;
const NOTIFICATION_CAPACITY: usize = 64;

/// Handle to a running session task
pub struct GameSession {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Notification>,
    snapshots: watch::Receiver<GridSnapshot>,
    task: JoinHandle<Result<GridSnapshot, GridError>>,
}

impl GameSession {
    /// Spawn the session task on the current tokio runtime.
    pub fn spawn(mut grid: Grid, store: Arc<dyn BestScoreStore>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (events, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        // Construction noise; nobody is subscribed yet.
        grid.take_notifications();
        let (snap_tx, snap_rx) = watch::channel(grid.snapshot());

        let task = SessionTask {
            grid,
            commands: cmd_rx,
            events: events.clone(),
            snapshots: snap_tx,
            store,
            save: None,
            deadline: None,
        };
        let task = tokio::spawn(task.run());

        Self {
            commands: cmd_tx,
            events,
            snapshots: snap_rx,
            task,
        }
    }

    /// Queue a command, waiting for room.
    pub async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Queue a command without waiting.
    pub fn try_send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.try_send(command).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SessionError::Busy,
            mpsc::error::TrySendError::Closed(_) => SessionError::Closed,
        })
    }

    /// A sender for producers that outlive a borrow of the session
    pub fn commands(&self) -> mpsc::Sender<Command> {
        self.commands.clone()
    }

    /// Observer registration. Receivers that fall behind lose the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }

    pub fn snapshots(&self) -> watch::Receiver<GridSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot (may trail queued commands)
    pub fn snapshot(&self) -> GridSnapshot {
        *self.snapshots.borrow()
    }

    /// Snapshot taken after every command queued before this call
    pub async fn query(&self) -> Result<GridSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Stop the task, wait for pending best-score writes, and return the final state.
    pub async fn shutdown(self) -> Result<GridSnapshot, SessionError> {
        // A closed queue means the task already ended; its result is in the handle.
        let _ = self.commands.send(Command::Shutdown).await;
        let snapshot = self.task.await??;
        Ok(snapshot)
    }
}

struct SessionTask {
    grid: Grid,
    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Notification>,
    snapshots: watch::Sender<GridSnapshot>,
    store: Arc<dyn BestScoreStore>,
    /// In-flight best-score write; resolves to the value when the store accepted it
    save: Option<JoinHandle<Option<u32>>>,
    /// Next gravity tick; `None` while gravity is off
    deadline: Option<Instant>,
}

impl SessionTask {
    async fn run(mut self) -> Result<GridSnapshot, GridError> {
        tracing::debug!(episode = self.grid.episode(), "session started");

        let result = self.event_loop().await;
        if let Err(err) = &result {
            tracing::error!(error = %err, "session stopped on a broken grid");
        }

        // Settle the running write first: a failed one leaves the value unconfirmed,
        // so the final queue below picks it up again.
        self.drain_save().await;
        self.grid.queue_best_write();
        self.persist_best_score();
        self.drain_save().await;

        tracing::debug!(score = self.grid.score(), "session stopped");
        result.map(|()| self.grid.snapshot())
    }

    async fn event_loop(&mut self) -> Result<(), GridError> {
        loop {
            let deadline = self.deadline;
            let gravity = async move {
                match deadline {
                    Some(at) => time::sleep_until(at).await,
                    None => future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                _ = gravity => self.tick()?,
                saved = wait_for(&mut self.save) => {
                    self.save = None;
                    self.finish_save(saved);
                }
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => return Ok(()),
                    Some(command) => self.handle(command)?,
                },
            }

            self.publish();
        }
    }

    fn handle(&mut self, command: Command) -> Result<(), GridError> {
        let was_active = self.grid.is_gravity_active();
        let level = self.grid.level();
        let episode = self.grid.episode();
        let spawned = self.grid.pieces_spawned();

        match command {
            Command::Start => self.grid.start(),
            Command::Action(action) => {
                GameController::new(&mut self.grid).apply(action)?;
            }
            Command::Pause => {
                self.grid.pause();
            }
            Command::Resume => {
                self.grid.resume();
            }
            Command::Reset => self.grid.reset(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.grid.snapshot());
            }
            Command::Shutdown => {}
        }

        if !self.grid.is_gravity_active() {
            self.deadline = None;
        } else if !was_active
            || self.grid.level() != level
            || self.grid.episode() != episode
            || self.grid.pieces_spawned() != spawned
        {
            // A new piece gets a full interval before its first fall.
            self.arm();
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), GridError> {
        let outcome = self.grid.gravity_tick()?;
        tracing::trace!(?outcome, "gravity tick");
        if self.grid.is_gravity_active() {
            self.arm();
        } else {
            self.deadline = None;
        }
        Ok(())
    }

    fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.grid.gravity_interval());
    }

    /// Fan out whatever the last mutation produced.
    fn publish(&mut self) {
        let notifications = self.grid.take_notifications();
        if notifications.is_empty() {
            return;
        }

        self.snapshots.send_replace(self.grid.snapshot());
        for notification in notifications {
            // No subscribers is fine.
            let _ = self.events.send(notification);
        }

        self.persist_best_score();
    }

    /// Start a write for the pending best score. One write runs at a time, so values
    /// reach the store in order; anything queued meanwhile waits for `finish_save`.
    fn persist_best_score(&mut self) {
        if self.save.is_some() {
            return;
        }
        let Some(best) = self.grid.take_best_score_write() else {
            return;
        };

        let store = Arc::clone(&self.store);
        self.save = Some(tokio::task::spawn_blocking(move || match store.save(best) {
            Ok(()) => Some(best),
            Err(err) => {
                tracing::warn!(error = %err, best, "failed to persist best score");
                None
            }
        }));
    }

    fn finish_save(&mut self, saved: Result<Option<u32>, JoinError>) {
        match saved {
            Ok(Some(best)) => self.grid.confirm_best_score_write(best),
            // Left unconfirmed; queued again on the next reset, game over or shutdown.
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "best score save task failed"),
        }
        // Anything queued while this write was running.
        self.persist_best_score();
    }

    async fn drain_save(&mut self) {
        // A confirmed write may start the next pending one.
        while let Some(save) = self.save.take() {
            let saved = save.await;
            self.finish_save(saved);
        }
    }
}

/// Completion of the in-flight write; never resolves when there is none.
async fn wait_for(save: &mut Option<JoinHandle<Option<u32>>>) -> Result<Option<u32>, JoinError> {
    match save {
        Some(handle) => handle.await,
        None => future::pending().await,
    }
}
