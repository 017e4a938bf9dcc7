//! Per-user operation locks
//!
//! Every mutating operation for a user runs under that user's lock, so
//! concurrent requests against one player execute one at a time.

use encore_core::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

type UserMutex = Arc<tokio::sync::Mutex<()>>;

/// Lock table keyed by user
#[derive(Default)]
pub struct UserLocks {
    table: Mutex<HashMap<UserId, UserMutex>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire `user_id`'s lock, waiting for any operation in flight
    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries nobody holds or waits on
            table.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            Arc::clone(table.entry(user_id.clone()).or_default())
        };
        mutex.lock_owned().await
    }

    /// Users with a lock currently held or awaited
    pub fn active(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|mutex| Arc::strong_count(mutex) > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let user = UserId::new("u1");

        let guard = locks.lock(&user).await;
        let contender = {
            let locks = Arc::clone(&locks);
            let user = user.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(&user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_users_do_not_block() {
        let locks = UserLocks::new();
        let _a = locks.lock(&UserId::new("a")).await;
        let _b = tokio::time::timeout(Duration::from_millis(50), locks.lock(&UserId::new("b")))
            .await
            .expect("lock for another user should not wait");
        assert_eq!(locks.active(), 2);
    }

    #[tokio::test]
    async fn released_entries_are_pruned() {
        let locks = UserLocks::new();
        drop(locks.lock(&UserId::new("a")).await);
        let _b = locks.lock(&UserId::new("b")).await;
        assert_eq!(locks.table.lock().unwrap().len(), 1);
    }
}
