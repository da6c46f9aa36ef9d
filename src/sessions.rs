use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::renderer::FormRenderer;

pub type SharedRenderer = Arc<Mutex<FormRenderer>>;

struct SessionEntry {
    renderer: SharedRenderer,
    last_seen: Instant,
}

/// In-progress fill-outs, keyed by session id.
///
/// Each renderer sits behind its own async mutex, so calls on one session run one at
/// a time.
pub struct FillSessions {
    entries: DashMap<Uuid, SessionEntry>,
}

impl FillSessions {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn start(&self, renderer: FormRenderer) -> (Uuid, SharedRenderer) {
        let id = Uuid::now_v7();
        let renderer = Arc::new(Mutex::new(renderer));
        self.entries.insert(
            id,
            SessionEntry {
                renderer: renderer.clone(),
                last_seen: Instant::now(),
            },
        );
        (id, renderer)
    }

    /// Look up a session and mark it as used.
    pub fn get(&self, id: Uuid) -> Option<SharedRenderer> {
        let mut entry = self.entries.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.renderer.clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop sessions idle for longer than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_seen) < max_age);
        let dropped = before.saturating_sub(self.entries.len());
        if dropped > 0 {
            tracing::debug!(dropped, "Expired fill sessions removed");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FillSessions {
    fn default() -> Self {
        Self::new()
    }
}
