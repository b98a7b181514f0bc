use serde_json::Value;
use std::collections::HashMap;

/// In-memory query cache keyed by scope strings ("board:{id}",
/// "labels", ...). Reads are eventually consistent; the workflow's only
/// discipline is to invalidate the destination board after a commit.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Value>,
}

/// Snapshot taken when an optimistic value is applied. Hand it back to
/// `rollback` on failure or `confirm` on success.
#[derive(Debug)]
pub struct OptimisticUpdate {
    key: String,
    previous: Option<Value>,
}

impl QueryCache {
    pub fn new() -> QueryCache {
        QueryCache::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop every cached query scoped to one board.
    pub fn invalidate_board(&mut self, board_id: &str) {
        let prefix = format!("board:{}", board_id);
        self.entries
            .retain(|key, _| key != &prefix && !key.starts_with(&format!("{}:", prefix)));
    }

    /// Apply a predicted value ahead of the request and keep the old
    /// one for compensation.
    pub fn apply_optimistic(&mut self, key: &str, predicted: Value) -> OptimisticUpdate {
        let previous = self.entries.insert(key.to_string(), predicted);
        OptimisticUpdate {
            key: key.to_string(),
            previous,
        }
    }

    /// The request failed: restore what was there before.
    pub fn rollback(&mut self, update: OptimisticUpdate) {
        match update.previous {
            Some(previous) => {
                self.entries.insert(update.key, previous);
            }
            None => {
                self.entries.remove(&update.key);
            }
        }
    }

    /// The request succeeded: drop the prediction and let the next read
    /// fetch the authoritative value.
    pub fn confirm(&mut self, update: OptimisticUpdate) {
        self.entries.remove(&update.key);
    }
}
