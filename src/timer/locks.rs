use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slots = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// One async mutex per task id. Entries are dropped once nobody holds or
/// waits on them.
#[derive(Clone, Default)]
pub struct TaskLocks {
    slots: Slots,
}

pub struct TaskGuard {
    key: String,
    slots: Slots,
    guard: Option<OwnedMutexGuard<()>>,
}

fn lock_slots(slots: &Slots) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
    match slots.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl TaskLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, task_id: &str) -> TaskGuard {
        let slot = {
            let mut slots = lock_slots(&self.slots);
            slots.entry(task_id.to_string()).or_default().clone()
        };

        let guard = slot.lock_owned().await;
        TaskGuard {
            key: task_id.to_string(),
            slots: self.slots.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        lock_slots(&self.slots).len()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut slots = lock_slots(&self.slots);
        let idle = slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1);
        if idle {
            slots.remove(&self.key);
        }
    }
}
