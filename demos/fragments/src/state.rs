use std::sync::Mutex;

use crate::components::{Home, TaskCount};

#[derive(Default)]
struct Inner {
    count: u32,
    tasks: Vec<String>,
}

/// In-memory state shared by all workers.
#[derive(Default)]
pub struct AppState {
    inner: Mutex<Inner>,
}

impl AppState {
    pub fn home(&self) -> Home {
        let inner = self.lock();
        Home {
            count: inner.count,
            tasks: inner.tasks.clone(),
        }
    }

    pub fn task_count(&self) -> TaskCount {
        TaskCount {
            tasks: self.lock().tasks.clone(),
        }
    }

    pub fn increment(&self) -> u32 {
        let mut inner = self.lock();
        inner.count = inner.count.saturating_add(1);
        inner.count
    }

    pub fn add_task(&self, name: String) {
        self.lock().tasks.push(name);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
