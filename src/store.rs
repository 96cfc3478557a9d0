use std::collections::HashMap;
use thiserror::Error as ThisError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::commands::del::Del;
use crate::commands::executable::Executable;
use crate::commands::get::Get;
use crate::commands::incr::Incr;
use crate::commands::set::Set;
use crate::commands::Command;
use crate::frame::Frame;

/// The Store is a handle to the store actor: a single task that owns the key-value map and
/// applies commands to it one at a time, in the order they were enqueued.
///
/// Handles are cheap to clone and may be shared between any number of connections. The map
/// itself never leaves the actor task. The actor stops once every handle has been dropped.
#[derive(Clone)]
pub struct Store {
    sender: mpsc::Sender<Request>,
}

impl Store {
    /// Spawns the store actor on the current Tokio runtime. `capacity` bounds the request
    /// queue; once it is full, callers wait for room before their request is accepted.
    pub fn new(capacity: usize) -> Store {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        tokio::spawn(run_actor(Db::new(), receiver));

        Self { sender }
    }

    /// A handle whose actor has already stopped.
    #[cfg(test)]
    pub(crate) fn closed() -> Store {
        let (sender, _) = mpsc::channel(1);
        Self { sender }
    }

    /// Submits `command` to the actor and waits for its reply.
    pub async fn execute(&self, command: Command) -> Result<Frame, StoreError> {
        let (respond_to, response) = oneshot::channel();
        let request = Request {
            command,
            respond_to,
        };

        self.sender
            .send(request)
            .await
            .map_err(|_| StoreError::Closed)?;

        response.await.map_err(|_| StoreError::Closed)
    }

    pub async fn get(&self, key: impl Into<String>) -> Result<Frame, StoreError> {
        self.execute(Command::Get(Get { key: key.into() })).await
    }

    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Frame, StoreError> {
        self.execute(Command::Set(Set {
            key: key.into(),
            value: value.into(),
        }))
        .await
    }

    pub async fn incr(&self, key: impl Into<String>) -> Result<Frame, StoreError> {
        self.execute(Command::Incr(Incr { key: key.into() })).await
    }

    pub async fn del(&self, key: impl Into<String>) -> Result<Frame, StoreError> {
        self.execute(Command::Del(Del { key: key.into() })).await
    }
}

/// A command together with the one-shot slot its reply is delivered to.
#[derive(Debug)]
pub struct Request {
    pub command: Command,
    pub respond_to: oneshot::Sender<Frame>,
}

#[derive(Debug, ThisError, PartialEq)]
pub enum StoreError {
    #[error("store actor is no longer running")]
    Closed,
}

async fn run_actor(mut db: Db, mut receiver: mpsc::Receiver<Request>) {
    info!("Store actor started");

    while let Some(Request {
        command,
        respond_to,
    }) = receiver.recv().await
    {
        debug!("Applying command: {:?}", command);
        let res = command.exec(&mut db);

        // The requester may have disconnected while waiting. The command has already been
        // applied, only the reply is lost.
        if let Err(res) = respond_to.send(res) {
            debug!("Dropping reply for a requester that went away: {}", res);
        }
    }

    info!("Store actor stopped, {} keys discarded", db.size());
}

/// The key-value state owned by the store actor.
#[derive(Debug, Default)]
pub struct Db {
    keys: HashMap<String, String>,
}

impl Db {
    pub fn new() -> Db {
        Db {
            keys: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: String, value: String) {
        self.keys.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.keys.remove(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// Adds `increment` to the integer stored at `key`, treating a missing key as zero.
    /// Leaves the stored value untouched when it is not an integer or the sum overflows.
    pub fn incr_by(&mut self, key: &str, increment: i64) -> Result<i64, DbError> {
        let current = match self.get(key) {
            Some(value) => value.parse::<i64>().map_err(|_| DbError::NotAnInteger)?,
            None => 0,
        };

        let value = current
            .checked_add(increment)
            .ok_or(DbError::NotAnInteger)?;
        self.set(key.to_string(), value.to_string());

        Ok(value)
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum DbError {
    #[error("value is not an integer or out of range")]
    NotAnInteger,
}
