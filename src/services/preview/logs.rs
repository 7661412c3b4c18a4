//! Bounded FIFO of preview log lines.

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::types::{LogChannel, LogEntry};

#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Append a line, evicting the oldest when full.
    pub fn push(&self, channel: LogChannel, text: impl Into<String>) {
        let mut entries = self.entries();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            channel,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let logs = LogBuffer::new(3);
        for i in 0..5 {
            logs.push(LogChannel::Stdout, format!("line {}", i));
        }
        let texts: Vec<String> = logs.snapshot().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(logs.len(), 3);
    }

    #[test]
    fn test_clear() {
        let logs = LogBuffer::new(10);
        logs.push(LogChannel::Stderr, "oops");
        assert_eq!(logs.snapshot()[0].channel, LogChannel::Stderr);
        logs.clear();
        assert!(logs.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let logs = LogBuffer::new(0);
        logs.push(LogChannel::Stdout, "a");
        logs.push(LogChannel::Stdout, "b");
        assert_eq!(logs.capacity(), 1);
        assert_eq!(logs.snapshot()[0].text, "b");
    }
}
