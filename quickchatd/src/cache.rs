use quickchat_common::HistoryState;

/// Tracks recently sent messages so the engine can refuse to repeat a
/// message inside the cooldown window.
///
/// Pruning is lazy: every `seen_recently` query first drops entries older
/// than the cooldown, so no background task is needed.
pub struct RecentMessageCache {
    cooldown_s: f64,
    max_entries: usize,
    entries: Vec<(String, f64)>,
}

impl RecentMessageCache {
    pub fn new(cooldown_s: f64, max_entries: usize) -> Self {
        Self {
            cooldown_s,
            max_entries,
            entries: Vec::new(),
        }
    }

    /// Check whether this exact message was sent within the cooldown window
    pub fn seen_recently(&mut self, message: &str, now: f64) -> bool {
        let cutoff = now - self.cooldown_s;
        self.entries.retain(|(_, stamp)| *stamp >= cutoff);
        self.entries.iter().any(|(m, _)| m == message)
    }

    /// Record that a message was sent at `now`
    pub fn add(&mut self, message: &str, now: f64) {
        self.entries.push((message.to_string(), now));
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    /// Restore entries from a persisted history, keeping only the most
    /// recent `max_entries` of them.
    pub fn restore(&mut self, history: &HistoryState) {
        let entries = &history.recent_messages;
        let start = entries.len().saturating_sub(self.max_entries);
        self.entries = entries[start..].to_vec();
    }

    /// Snapshot the current entries for persistence
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_boundary() {
        let mut cache = RecentMessageCache::new(600.0, 200);
        cache.add("X", 0.0);

        assert!(cache.seen_recently("X", 599.0));
        assert!(!cache.seen_recently("X", 601.0));
    }

    #[test]
    fn test_pruned_entries_stay_gone() {
        let mut cache = RecentMessageCache::new(10.0, 200);
        cache.add("old", 0.0);

        // The expired query prunes the entry, so an earlier timestamp
        // afterwards still misses.
        assert!(!cache.seen_recently("old", 100.0));
        assert!(!cache.seen_recently("old", 5.0));
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let mut cache = RecentMessageCache::new(1000.0, 3);
        for i in 0..5 {
            cache.add(&format!("m{}", i), i as f64);
        }

        assert_eq!(cache.entries().len(), 3);
        assert!(!cache.seen_recently("m0", 10.0));
        assert!(!cache.seen_recently("m1", 10.0));
        assert!(cache.seen_recently("m2", 10.0));
        assert!(cache.seen_recently("m4", 10.0));
    }

    #[test]
    fn test_restore_caps_entries() {
        let history = HistoryState {
            last_sent_message: String::new(),
            recent_messages: (0..10).map(|i| (format!("m{}", i), i as f64)).collect(),
        };

        let mut cache = RecentMessageCache::new(1000.0, 4);
        cache.restore(&history);

        assert_eq!(cache.entries().len(), 4);
        assert!(cache.seen_recently("m9", 10.0));
        assert!(!cache.seen_recently("m5", 10.0));
    }
}
