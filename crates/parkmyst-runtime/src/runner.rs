//! Async front-end: one tokio task owns the [`Game`], participants talk to
//! it through a cloneable [`GameHandle`].

use parkmyst_core::error::GameError;
use parkmyst_core::event::Event;
use parkmyst_core::instance::{InstanceId, LifecycleState};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::game::{Game, GameStats};

#[derive(Debug)]
enum Command {
    Publish(Event),
    Start(InstanceId),
    Reset(InstanceId),
    End(InstanceId),
    EndGame,
    Lifecycle(InstanceId, oneshot::Sender<Option<LifecycleState>>),
    Stats(oneshot::Sender<GameStats>),
    Shutdown,
}

/// Cloneable sender side of a running game.
#[derive(Debug, Clone)]
pub struct GameHandle {
    tx: mpsc::Sender<Command>,
}

impl GameHandle {
    async fn send(&self, command: Command) -> Result<(), GameError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| GameError::RuntimeClosed)
    }

    /// Queues an event for publication.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn publish(&self, event: Event) -> Result<(), GameError> {
        self.send(Command::Publish(event)).await
    }

    /// Sends a start signal to `id`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn start(&self, id: InstanceId) -> Result<(), GameError> {
        self.send(Command::Start(id)).await
    }

    /// Resets `id`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn reset(&self, id: InstanceId) -> Result<(), GameError> {
        self.send(Command::Reset(id)).await
    }

    /// Ends `id`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn end(&self, id: InstanceId) -> Result<(), GameError> {
        self.send(Command::End(id)).await
    }

    /// Ends the whole game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn end_game(&self) -> Result<(), GameError> {
        self.send(Command::EndGame).await
    }

    /// Lifecycle state of `id` after every earlier command was processed.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn lifecycle(&self, id: InstanceId) -> Result<Option<LifecycleState>, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Lifecycle(id, reply)).await?;
        rx.await.map_err(|_| GameError::RuntimeClosed)
    }

    /// Counters after every earlier command was processed.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` once the runner has stopped.
    pub async fn stats(&self) -> Result<GameStats, GameError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stats(reply)).await?;
        rx.await.map_err(|_| GameError::RuntimeClosed)
    }

    /// Asks the runner to stop after the commands already queued.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeClosed` if it has already stopped.
    pub async fn shutdown(&self) -> Result<(), GameError> {
        self.send(Command::Shutdown).await
    }
}

/// Owns a [`Game`] and applies commands to it one at a time.
#[derive(Debug)]
pub struct GameRunner {
    game: Game,
    rx: mpsc::Receiver<Command>,
}

impl GameRunner {
    /// Wraps `game`; the channel is bounded by its configured queue capacity.
    #[must_use]
    pub fn new(game: Game) -> (Self, GameHandle) {
        let (tx, rx) = mpsc::channel(game.config().queue_capacity.max(1));
        (Self { game, rx }, GameHandle { tx })
    }

    /// Starts the game if needed and processes commands until shutdown or
    /// until every handle is dropped. Returns the game for read-out.
    pub async fn run(mut self) -> Game {
        if !self.game.is_started() {
            self.game.start();
        }
        while let Some(command) = self.rx.recv().await {
            debug!(?command, "command received");
            match command {
                Command::Publish(event) => self.game.publish(event),
                Command::Start(id) => self.game.start_instance(id),
                Command::Reset(id) => self.game.reset(id),
                Command::End(id) => self.game.end(id),
                Command::EndGame => self.game.end_game(),
                Command::Lifecycle(id, reply) => {
                    let _ = reply.send(self.game.lifecycle(id));
                }
                Command::Stats(reply) => {
                    let _ = reply.send(self.game.stats());
                }
                Command::Shutdown => break,
            }
        }
        info!(stats = ?self.game.stats(), "game runner stopped");
        self.game
    }

    /// Runs the game on a new tokio task.
    #[must_use]
    pub fn spawn(game: Game) -> (JoinHandle<Game>, GameHandle) {
        let (runner, handle) = Self::new(game);
        (tokio::spawn(runner.run()), handle)
    }
}
