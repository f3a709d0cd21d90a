use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-account mutual exclusion for balance-check-then-insert sequences.
///
/// Cloning shares the same lock table.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`; released when the guard drops.
    pub async fn lock(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        // the map shard guard must be released before awaiting
        let lock = Arc::clone(self.locks.entry(user_id).or_default().value());
        lock.lock_owned().await
    }

    /// Locks two accounts, always in id order, so opposite transfers between
    /// the same pair cannot deadlock. Locking one account twice yields a
    /// single guard.
    pub async fn lock_pair(
        &self,
        first: Uuid,
        second: Uuid,
    ) -> (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>) {
        if first == second {
            return (self.lock(first).await, None);
        }
        let (low, high) = if first < second { (first, second) } else { (second, first) };
        let low_guard = self.lock(low).await;
        let high_guard = self.lock(high).await;
        (low_guard, Some(high_guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_account_is_exclusive() {
        let locks = AccountLocks::new();
        let user = Uuid::new_v4();

        let guard = locks.lock(user).await;
        let contender = tokio::time::timeout(Duration::from_millis(50), locks.lock(user)).await;
        assert!(contender.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.lock(user)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_accounts_do_not_block() {
        let locks = AccountLocks::new();

        let _first = locks.lock(Uuid::new_v4()).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(Uuid::new_v4())).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn pair_holds_both_accounts() {
        let locks = AccountLocks::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let guards = locks.lock_pair(a, b).await;
        for user in [a, b] {
            let contender = tokio::time::timeout(Duration::from_millis(50), locks.lock(user)).await;
            assert!(contender.is_err());
        }

        drop(guards);
        let reversed = tokio::time::timeout(Duration::from_millis(50), locks.lock_pair(b, a)).await;
        assert!(reversed.is_ok());
    }

    #[tokio::test]
    async fn opposite_pairs_do_not_deadlock() {
        let locks = AccountLocks::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let tasks = (0..50).map(|i| {
            let locks = locks.clone();
            tokio::spawn(async move {
                let (x, y) = if i % 2 == 0 { (a, b) } else { (b, a) };
                let _guards = locks.lock_pair(x, y).await;
                tokio::task::yield_now().await;
            })
        });
        let all = futures::future::join_all(tasks);

        let finished = tokio::time::timeout(Duration::from_secs(5), all).await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn same_account_pair_is_one_guard() {
        let locks = AccountLocks::new();
        let user = Uuid::new_v4();

        let (_guard, second) = locks.lock_pair(user, user).await;
        assert!(second.is_none());
    }
}
