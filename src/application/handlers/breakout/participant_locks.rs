//! Per-(session, user) async locks for breakout membership changes.
//!
//! Join and leave for the same user in the same session run one at a time.
//! Entries hold weak references and are pruned as the map grows, so idle
//! users cost nothing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::{ClassroomError, SessionId, UserId};

type Key = (SessionId, UserId);

const PRUNE_THRESHOLD: usize = 256;

#[derive(Default)]
pub struct ParticipantLocks {
    locks: Mutex<HashMap<Key, Weak<AsyncMutex<()>>>>,
}

impl ParticipantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the user's breakout membership in the
    /// session. Released when the guard drops.
    pub async fn acquire(
        &self,
        session_id: SessionId,
        user_id: &UserId,
    ) -> Result<OwnedMutexGuard<()>, ClassroomError> {
        let lock = self.lock_for((session_id, user_id.clone()))?;
        Ok(lock.lock_owned().await)
    }

    fn lock_for(&self, key: Key) -> Result<Arc<AsyncMutex<()>>, ClassroomError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| ClassroomError::infrastructure("participant lock map poisoned"))?;

        if locks.len() > PRUNE_THRESHOLD {
            locks.retain(|_, weak| weak.strong_count() > 0);
        }
        if let Some(existing) = locks.get(&key).and_then(Weak::upgrade) {
            return Ok(existing);
        }

        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(key, Arc::downgrade(&lock));
        Ok(lock)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}
