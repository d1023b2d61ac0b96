//! Bounded in-process trace store.
//!
//! Captures what a running server did (HTTP traffic, action calls, resource
//! reads, plan steps) in a fixed-capacity FIFO. Every entry carries a
//! strictly increasing sequence number assigned inside the same critical
//! section as the append, so sequence order and storage order always agree.

use chrono::{DateTime, Utc};
use opsdeck_core::collections::BoundedBuffer;
use opsdeck_core::text::truncate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Capacity of the communication trace used by the server.
pub const COMMUNICATION_TRACE_CAPACITY: usize = 128;

/// Capacity of the lightweight trace used by single-purpose tools.
pub const LIGHT_TRACE_CAPACITY: usize = 64;

/// Longest `details` payload kept per entry, before the truncation marker.
pub const MAX_DETAILS_CHARS: usize = 500;

/// Well-known trace categories.
pub mod category {
    pub const HTTP: &str = "HTTP";
    pub const TOOL: &str = "TOOL";
    pub const RESOURCE: &str = "RESOURCE";
    pub const SYSTEM: &str = "SYS";
    pub const PLAN: &str = "PLAN";
}

/// Which way a traced message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    Incoming,
    Outgoing,
    Internal,
}

/// One captured event. Entries are immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub direction: TraceDirection,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Aggregate view over the entries currently held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStats {
    pub total: usize,
    pub capacity: usize,
    pub incoming: usize,
    pub outgoing: usize,
    pub internal: usize,
    pub by_category: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// Thread-safe, append-only, fixed-capacity trace log.
///
/// Shared as `Arc<BoundedTraceStore>`; `add` never fails and callers only
/// ever receive clones of stored entries.
///
/// # Example
///
/// ```rust
/// use opsdeck_observability::{BoundedTraceStore, TraceDirection};
///
/// let store = BoundedTraceStore::new(2);
/// store.add(TraceDirection::Internal, "SYS", "one", None);
/// store.add(TraceDirection::Internal, "SYS", "two", None);
/// store.add(TraceDirection::Internal, "SYS", "three", None);
///
/// let entries = store.entries();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].sequence, 2);
/// assert_eq!(entries[1].message, "three");
/// ```
#[derive(Debug)]
pub struct BoundedTraceStore {
    entries: Mutex<BoundedBuffer<TraceEntry>>,
    sequence: AtomicU64,
}

impl Default for BoundedTraceStore {
    fn default() -> Self {
        Self::new(COMMUNICATION_TRACE_CAPACITY)
    }
}

impl BoundedTraceStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(BoundedBuffer::new(capacity)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Store sized for lightweight single-purpose tools.
    pub fn light() -> Self {
        Self::new(LIGHT_TRACE_CAPACITY)
    }

    // A panic while holding the lock cannot leave the buffer half-written,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, BoundedBuffer<TraceEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry and return a copy of it.
    ///
    /// Blank details are dropped; long details are cut to
    /// [`MAX_DETAILS_CHARS`] plus a truncation marker.
    pub fn add(
        &self,
        direction: TraceDirection,
        category: impl Into<String>,
        message: impl Into<String>,
        details: Option<&str>,
    ) -> TraceEntry {
        let details = details
            .filter(|d| !d.trim().is_empty())
            .map(|d| truncate(d, MAX_DETAILS_CHARS));
        let category = category.into();
        let message = message.into();

        let mut entries = self.lock();
        let entry = TraceEntry {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            timestamp: Utc::now(),
            direction,
            category,
            message,
            details,
        };
        entries.push(entry.clone());
        entry
    }

    /// Incoming HTTP request with an optional body preview.
    pub fn add_request(&self, method: &str, path: &str, body: Option<&str>) -> TraceEntry {
        self.add(
            TraceDirection::Incoming,
            category::HTTP,
            format!("{} {}", method, path),
            body,
        )
    }

    /// Outgoing HTTP response status.
    pub fn add_response(&self, status: u16, content_type: Option<&str>) -> TraceEntry {
        self.add(
            TraceDirection::Outgoing,
            category::HTTP,
            format!("Status {}", status),
            content_type,
        )
    }

    pub fn add_action_call(&self, name: &str, arguments: Option<&str>) -> TraceEntry {
        self.add(
            TraceDirection::Internal,
            category::TOOL,
            format!("call: {}", name),
            arguments,
        )
    }

    pub fn add_action_result(&self, name: &str, result: Option<&str>) -> TraceEntry {
        self.add(
            TraceDirection::Internal,
            category::TOOL,
            format!("result: {}", name),
            result,
        )
    }

    pub fn add_resource_read(&self, uri: &str) -> TraceEntry {
        self.add(
            TraceDirection::Incoming,
            category::RESOURCE,
            format!("read: {}", uri),
            None,
        )
    }

    pub fn add_system(&self, message: impl Into<String>) -> TraceEntry {
        self.add(TraceDirection::Internal, category::SYSTEM, message, None)
    }

    /// Point-in-time copy of all entries, oldest first.
    pub fn entries(&self) -> Vec<TraceEntry> {
        self.lock().to_vec()
    }

    /// The `n` most recent entries, newest first.
    pub fn latest(&self, n: usize) -> Vec<TraceEntry> {
        self.lock().latest(n)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Sequence number the most recent append received, 0 if none.
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> TraceStats {
        let entries = self.lock();
        let mut stats = TraceStats {
            total: entries.len(),
            capacity: entries.capacity(),
            first_timestamp: entries.front().map(|e| e.timestamp),
            last_timestamp: entries.back().map(|e| e.timestamp),
            ..TraceStats::default()
        };
        for entry in entries.iter() {
            match entry.direction {
                TraceDirection::Incoming => stats.incoming += 1,
                TraceDirection::Outgoing => stats.outgoing += 1,
                TraceDirection::Internal => stats.internal += 1,
            }
            *stats.by_category.entry(entry.category.clone()).or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequence_starts_at_one() {
        let store = BoundedTraceStore::default();
        assert!(store.is_empty());
        assert_eq!(store.last_sequence(), 0);
        let first = store.add_system("boot");
        assert_eq!(first.sequence, 1);
        assert_eq!(store.add_system("ready").sequence, 2);
        assert_eq!(store.capacity(), COMMUNICATION_TRACE_CAPACITY);
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        let store = BoundedTraceStore::new(3);
        for i in 0..10 {
            store.add_system(format!("event {}", i));
        }
        let entries = store.entries();
        assert_eq!(entries.len(), 3);
        let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["event 7", "event 8", "event 9"]);
        assert_eq!(entries[0].sequence, 8);
        assert_eq!(store.last_sequence(), 10);
    }

    #[test]
    fn test_details_normalization() {
        let store = BoundedTraceStore::light();
        assert_eq!(store.add_request("GET", "/health", Some("   ")).details, None);

        let long = "a".repeat(MAX_DETAILS_CHARS + 20);
        let entry = store.add_action_call("trace.echo", Some(&long));
        let details = entry.details.unwrap();
        assert!(details.ends_with("...(truncated)"));
        assert_eq!(details.chars().count(), MAX_DETAILS_CHARS + "...(truncated)".len());
    }

    #[test]
    fn test_helper_shapes() {
        let store = BoundedTraceStore::default();
        let req = store.add_request("POST", "/actions/trace.ping", Some("{}"));
        assert_eq!(req.direction, TraceDirection::Incoming);
        assert_eq!(req.category, "HTTP");
        assert_eq!(req.message, "POST /actions/trace.ping");

        let resp = store.add_response(200, Some("application/json"));
        assert_eq!(resp.direction, TraceDirection::Outgoing);
        assert_eq!(resp.message, "Status 200");
        assert_eq!(resp.details.as_deref(), Some("application/json"));

        assert_eq!(store.add_action_result("x", None).message, "result: x");
        assert_eq!(store.add_resource_read("ops/overview").category, "RESOURCE");
    }

    #[test]
    fn test_stats() {
        let store = BoundedTraceStore::default();
        assert_eq!(store.stats().first_timestamp, None);

        store.add_request("GET", "/", None);
        store.add_response(200, None);
        store.add_system("note");
        store.add_system("note 2");

        let stats = store.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.incoming, 1);
        assert_eq!(stats.outgoing, 1);
        assert_eq!(stats.internal, 2);
        assert_eq!(stats.by_category.get("HTTP"), Some(&2));
        assert_eq!(stats.by_category.get("SYS"), Some(&2));
        assert!(stats.first_timestamp <= stats.last_timestamp);
    }

    #[test]
    fn test_concurrent_appends_are_totally_ordered() {
        let store = Arc::new(BoundedTraceStore::new(1000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        store.add_system(format!("{}-{}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = store.entries();
        assert_eq!(entries.len(), 800);
        assert!(entries.windows(2).all(|w| w[0].sequence + 1 == w[1].sequence));
    }

    #[test]
    fn test_entry_serialization() {
        let store = BoundedTraceStore::default();
        let entry = store.add_response(404, None);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["direction"], "outgoing");
        assert_eq!(json["sequence"], 1);
        assert!(json.get("details").is_none());
    }
}
