use super::PhotoRef;
use crate::error::{Result, SwipeCleanError};
use crate::library::AssetDeleter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Swipe direction for a triage decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Swipe left: queue the photo for deletion
    Delete,
    /// Swipe right: leave the photo alone
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The cursor points at a photo
    Active,
    /// Every photo in the working set has been decided
    Exhausted,
}

/// What happens to queued deletions when the working set changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePolicy {
    /// Keep the queue; already-queued photos are left out of the new working set
    #[default]
    Carry,
    /// Start the new session with an empty queue
    Discard,
}

/// Counts describing a session's progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageStatistics {
    pub total: usize,
    pub kept: usize,
    pub queued: usize,
    pub remaining: usize,
}

/// A single pass over a working set of photos.
///
/// The cursor only moves forward, one step per decision. Deletions are only
/// queued here; nothing touches the library until [`TriageSession::commit`].
#[derive(Debug, Default)]
pub struct TriageSession {
    working_set: Vec<Arc<PhotoRef>>,
    cursor: usize,
    deletion_queue: Vec<Arc<PhotoRef>>,
    kept: usize,
}

impl TriageSession {
    pub fn new(working_set: Vec<Arc<PhotoRef>>) -> Self {
        Self {
            working_set,
            cursor: 0,
            deletion_queue: Vec::new(),
            kept: 0,
        }
    }

    /// Replaces this session with one over `working_set`.
    ///
    /// With [`QueuePolicy::Carry`] the pending deletions move to the new
    /// session and any photo already queued is dropped from the new working
    /// set, so it is never offered (or queued) twice.
    pub fn rebase(self, working_set: Vec<Arc<PhotoRef>>, policy: QueuePolicy) -> Self {
        match policy {
            QueuePolicy::Discard => {
                if !self.deletion_queue.is_empty() {
                    tracing::info!(
                        discarded = self.deletion_queue.len(),
                        "working set changed, discarding pending deletions"
                    );
                }
                Self::new(working_set)
            }
            QueuePolicy::Carry => {
                let queued: HashSet<&Path> = self.deletion_queue.iter().map(|p| p.id()).collect();
                let working_set: Vec<Arc<PhotoRef>> = working_set
                    .into_iter()
                    .filter(|p| !queued.contains(p.id()))
                    .collect();

                tracing::debug!(
                    carried = self.deletion_queue.len(),
                    photos = working_set.len(),
                    "working set changed, carrying pending deletions"
                );

                Self {
                    working_set,
                    cursor: 0,
                    deletion_queue: self.deletion_queue,
                    kept: 0,
                }
            }
        }
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.working_set.len() {
            SessionState::Active
        } else {
            SessionState::Exhausted
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state() == SessionState::Exhausted
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn working_set(&self) -> &[Arc<PhotoRef>] {
        &self.working_set
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    /// The photo under the cursor, or `None` once exhausted
    pub fn current_photo(&self) -> Option<&Arc<PhotoRef>> {
        self.working_set.get(self.cursor)
    }

    /// Records a decision for the current photo and advances the cursor.
    ///
    /// Returns the photo that was decided on.
    ///
    /// # Errors
    /// [`SwipeCleanError::InvalidState`] if the session is exhausted. The
    /// deletion queue is not modified in that case.
    pub fn decide(&mut self, direction: Direction) -> Result<Arc<PhotoRef>> {
        let photo = match self.working_set.get(self.cursor) {
            Some(p) => Arc::clone(p),
            None => {
                return Err(SwipeCleanError::InvalidState(format!(
                    "no photo left to decide on ({} of {} reviewed)",
                    self.cursor,
                    self.working_set.len()
                )))
            }
        };

        match direction {
            Direction::Delete => self.deletion_queue.push(Arc::clone(&photo)),
            Direction::Keep => self.kept += 1,
        }
        self.cursor += 1;

        tracing::debug!(
            photo = %photo.path.display(),
            ?direction,
            cursor = self.cursor,
            queued = self.deletion_queue.len(),
            "decision recorded"
        );

        Ok(photo)
    }

    pub fn pending_deletion_count(&self) -> usize {
        self.deletion_queue.len()
    }

    pub fn pending_deletions(&self) -> &[Arc<PhotoRef>] {
        &self.deletion_queue
    }

    /// Whether a commit would do anything
    pub fn can_commit(&self) -> bool {
        !self.deletion_queue.is_empty()
    }

    /// Deletes every queued photo in one batch.
    ///
    /// An empty queue returns `Ok(0)` without calling `deleter`. On success
    /// the queue is cleared and the number of deleted photos returned. On
    /// failure the queue is left exactly as it was so the caller can retry.
    pub fn commit<D: AssetDeleter + ?Sized>(&mut self, deleter: &mut D) -> Result<usize> {
        if self.deletion_queue.is_empty() {
            return Ok(0);
        }

        let count = self.deletion_queue.len();
        tracing::info!(count, "committing deletions");

        deleter.delete_assets(&self.deletion_queue).map_err(|message| {
            tracing::warn!(count, error = %message, "batch delete failed, queue kept");
            SwipeCleanError::Deletion(message)
        })?;

        self.deletion_queue.clear();
        tracing::info!(count, "deletions committed");

        Ok(count)
    }

    pub fn statistics(&self) -> TriageStatistics {
        TriageStatistics {
            total: self.working_set.len(),
            kept: self.kept,
            queued: self.deletion_queue.len(),
            remaining: self.working_set.len() - self.cursor,
        }
    }
}
