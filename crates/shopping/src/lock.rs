use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes read-modify-write sequences per shopping list inside this process.
///
/// Two imports into the same list would otherwise both miss an existing item
/// and insert duplicates. Writers in other processes are not covered.
#[derive(Clone, Default)]
pub struct ListLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

pub struct ListGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl ListLocks {
    pub async fn acquire(&self, list_id: &str) -> ListGuard {
        self.acquire_many([list_id]).await
    }

    /// Locks several lists, always in sorted order so callers never deadlock.
    pub async fn acquire_many<'a>(&self, list_ids: impl IntoIterator<Item = &'a str>) -> ListGuard {
        let mut list_ids: Vec<&str> = list_ids.into_iter().collect();
        list_ids.sort_unstable();
        list_ids.dedup();

        let mutexes: Vec<Arc<Mutex<()>>> = {
            let mut locks = self.locks.lock().await;
            // nobody else holds a handle on these
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);

            list_ids
                .into_iter()
                .map(|id| locks.entry(id.to_owned()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }

        ListGuard { _guards: guards }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_list_is_serialized() {
        let locks = ListLocks::default();
        let guard = locks.acquire("list-1").await;

        let other = locks.clone();
        let waiter = tokio::spawn(async move {
            let _guard = other.acquire("list-1").await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_lists_are_independent() {
        let locks = ListLocks::default();
        let _guard = locks.acquire("list-1").await;

        tokio::time::timeout(Duration::from_secs(1), locks.acquire("list-2"))
            .await
            .expect("list-2 must not wait on list-1");
    }

    #[tokio::test]
    async fn test_released_entries_are_pruned() {
        let locks = ListLocks::default();
        drop(locks.acquire_many(["b", "a", "b"]).await);
        assert_eq!(locks.len().await, 2);

        drop(locks.acquire("c").await);
        assert_eq!(locks.len().await, 1);
    }
}
