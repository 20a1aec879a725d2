//! Bounded in-process recent-activity buffer, keyed per user.
//!
//! This is the fast path behind the activity feed; the durable history
//! lives in the activity table and may lag behind this buffer during a
//! storage outage.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::model::ActivityEvent;

#[derive(Debug)]
pub struct ActivityLog {
    capacity: usize,
    entries: Mutex<HashMap<String, VecDeque<ActivityEvent>>>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Appends an event to the user's buffer, evicting the oldest entry
    /// once the buffer is full.
    pub fn record(&self, event: ActivityEvent) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let buffer = entries
            .entry(event.user_id.clone())
            .or_insert_with(VecDeque::new);
        buffer.push_back(event);
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
    }

    /// Most recent events first, bounded by `limit`.
    pub fn recent(&self, user_id: &str, limit: usize) -> Vec<ActivityEvent> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get(user_id) {
            Some(buffer) => {
                buffer.iter().rev().take(limit).cloned().collect()
            },
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn event(user_id: &str, n: i64) -> ActivityEvent {
        ActivityEvent {
            id: n,
            user_id: user_id.to_string(),
            dao_id: "dao-1".to_string(),
            activity_type: "contribution".to_string(),
            created_at: Utc::now() + Duration::seconds(n),
        }
    }

    #[test]
    fn recent_returns_newest_first() {
        let log = ActivityLog::new(10);
        for n in 0..3 {
            log.record(event("u-1", n));
        }

        let recent = log.recent("u-1", 10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, 2);
        assert_eq!(recent[2].id, 0);
    }

    #[test]
    fn buffer_is_bounded_per_user() {
        let log = ActivityLog::new(5);
        for n in 0..20 {
            log.record(event("u-1", n));
        }

        let recent = log.recent("u-1", 50);
        assert_eq!(recent.len(), 5);
        // Only the newest five survive.
        assert_eq!(recent[0].id, 19);
        assert_eq!(recent[4].id, 15);
    }

    #[test]
    fn users_do_not_share_buffers() {
        let log = ActivityLog::new(5);
        log.record(event("u-1", 1));
        log.record(event("u-2", 2));

        assert_eq!(log.recent("u-1", 10).len(), 1);
        assert_eq!(log.recent("u-2", 10).len(), 1);
        assert!(log.recent("u-3", 10).is_empty());
    }

    #[test]
    fn limit_truncates_results() {
        let log = ActivityLog::new(10);
        for n in 0..8 {
            log.record(event("u-1", n));
        }

        let recent = log.recent("u-1", 3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, 7);
    }
}
