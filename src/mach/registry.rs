use super::Val;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
struct Instance {
    id: u64,
    path: String,
    inbox: Vec<(String, Val)>,
}

#[derive(Debug, Default)]
struct Instances {
    next_id: u64,
    running: Vec<Instance>,
}

/// ## Running program instances
///
/// Shared by every session of one board. SHARE copies values into the
/// inbox of every other instance running the same program; each
/// instance drains its own inbox between statements. All of it happens
/// under the one lock.

#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Instances>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn register(&self, path: &str) -> u64 {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.running.push(Instance {
            id,
            path: path.to_string(),
            inbox: vec![],
        });
        id
    }

    pub fn unregister(&self, id: u64) {
        self.inner.lock().running.retain(|i| i.id != id);
    }

    /// Ids running `path`.
    pub fn instances(&self, path: &str) -> Vec<u64> {
        self.inner
            .lock()
            .running
            .iter()
            .filter(|i| i.path == path)
            .map(|i| i.id)
            .collect()
    }

    /// Returns how many instances received the values.
    pub fn share(&self, from: u64, values: &[(String, Val)]) -> usize {
        let mut inner = self.inner.lock();
        let path = match inner.running.iter().find(|i| i.id == from) {
            Some(i) => i.path.clone(),
            None => return 0,
        };
        let mut count = 0;
        for instance in inner.running.iter_mut() {
            if instance.id != from && instance.path == path {
                instance.inbox.extend(values.iter().cloned());
                count += 1;
            }
        }
        count
    }

    pub fn drain(&self, id: u64) -> Vec<(String, Val)> {
        let mut inner = self.inner.lock();
        match inner.running.iter_mut().find(|i| i.id == id) {
            Some(instance) => std::mem::take(&mut instance.inbox),
            None => vec![],
        }
    }
}
