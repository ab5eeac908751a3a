use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use behsanj_core::models::Feedback;

use crate::error::StoreError;

const OUTBOX_FILE: &str = "outbox.json";

/// A mutation made while the backend was unreachable. Creates and updates
/// carry the record as the mirror materialized it; replay is last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOp {
    /// A record minted locally that the backend has never seen. Replayed as
    /// an id-less create; the backend assigns its own id and tracking id and
    /// the mirror swaps the local record for that materialization.
    Create(Box<Feedback>),
    /// A record the backend already knows, changed offline.
    Update(Box<Feedback>),
    Delete { id: String },
}

/// Ordered queue of offline mutations, persisted next to the mirror files.
/// Divergence from the backend is exactly the contents of this queue.
#[derive(Debug)]
pub struct Outbox {
    path: PathBuf,
    queue: Vec<PendingOp>,
}

impl Outbox {
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let path = root.join(OUTBOX_FILE);
        let queue = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };
        Ok(Self { path, queue })
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> &[PendingOp] {
        &self.queue
    }

    pub fn push(&mut self, op: PendingOp) -> Result<(), StoreError> {
        self.queue.push(op);
        self.persist()
    }

    /// Drop the first `count` ops after they were replayed successfully.
    pub fn ack(&mut self, count: usize) -> Result<(), StoreError> {
        self.queue.drain(..count.min(self.queue.len()));
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string(&self.queue)?)?;
        Ok(())
    }
}
