//! Per-user DNA sessions, bounded by least recent use

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use combat_dna_core::DnaSession;

pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct Entry {
    session: Arc<DnaSession>,
    last_used: u64,
}

pub struct SessionCache {
    entries: HashMap<String, Entry>,
    max_sessions: usize,
    clock: u64,
}

impl SessionCache {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_sessions: max_sessions.max(1),
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The cached session for `user_id`, or a new one from `open`. A full
    /// cache first drops its least recently used session, idle ones before
    /// any still held by a request.
    pub fn get_or_open(&mut self, user_id: &str, open: impl FnOnce() -> DnaSession) -> Arc<DnaSession> {
        self.clock += 1;
        if let Some(entry) = self.entries.get_mut(user_id) {
            entry.last_used = self.clock;
            return entry.session.clone();
        }

        if self.entries.len() >= self.max_sessions {
            self.evict_one();
        }
        let session = Arc::new(open());
        self.entries.insert(
            user_id.to_string(),
            Entry {
                session: session.clone(),
                last_used: self.clock,
            },
        );
        session
    }

    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, e)| (Arc::strong_count(&e.session) > 1, e.last_used))
            .map(|(user_id, _)| user_id.clone());
        if let Some(user_id) = victim {
            self.entries.remove(&user_id);
            debug!(user_id = %user_id, "Evicted DNA session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_dna_core::{BaselineCache, Database, DnaConfig};

    fn opener(user_id: &str) -> impl FnOnce() -> DnaSession + '_ {
        move || {
            DnaSession::new(
                Arc::new(Database::open_in_memory().unwrap()),
                user_id,
                DnaConfig::default(),
                Arc::new(BaselineCache::new()),
            )
        }
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = SessionCache::new(2);
        cache.get_or_open("a", opener("a"));
        cache.get_or_open("b", opener("b"));
        // Touch "a" so "b" becomes the oldest
        cache.get_or_open("a", opener("a"));
        cache.get_or_open("c", opener("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.entries.contains_key("a"));
        assert!(!cache.entries.contains_key("b"));
        assert!(cache.entries.contains_key("c"));
    }

    #[test]
    fn test_sessions_in_use_outlive_idle_ones() {
        let mut cache = SessionCache::new(2);
        let held = cache.get_or_open("a", opener("a"));
        cache.get_or_open("b", opener("b"));
        cache.get_or_open("c", opener("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.entries.contains_key("a"));
        assert!(!cache.entries.contains_key("b"));

        let again = cache.get_or_open("a", opener("a"));
        assert!(Arc::ptr_eq(&held, &again));
    }

    #[test]
    fn test_zero_bound_still_serves_one_session() {
        let mut cache = SessionCache::new(0);
        let session = cache.get_or_open("a", opener("a"));
        assert_eq!(session.user_id(), "a");
        assert_eq!(cache.len(), 1);
    }
}
