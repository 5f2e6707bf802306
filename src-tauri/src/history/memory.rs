use std::{collections::VecDeque, sync::Arc};

use tokio::sync::Mutex;

use crate::db::{ConfidenceScore, DetectionEvent};

struct StoredDetection {
    event: DetectionEvent,
    scores: Vec<ConfidenceScore>,
}

struct MemoryInner {
    entries: VecDeque<StoredDetection>,
    next_id: i64,
    capacity: usize,
}

/// Session-scoped history kept in process memory.
///
/// Holds at most `capacity` detections; recording past that evicts the
/// oldest one together with its scores.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                entries: VecDeque::new(),
                next_id: 1,
                capacity,
            })),
        }
    }

    pub async fn record(&self, event: &DetectionEvent, scores: &[ConfidenceScore]) -> i64 {
        let mut inner = self.inner.lock().await;

        let id = inner.next_id;
        inner.next_id += 1;

        while inner.entries.len() >= inner.capacity {
            inner.entries.pop_front();
        }

        let mut event = event.clone();
        event.id = Some(id);
        let mut scores: Vec<ConfidenceScore> = scores
            .iter()
            .cloned()
            .map(|mut score| {
                score.history_id = Some(id);
                score
            })
            .collect();
        scores.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        inner.entries.push_back(StoredDetection { event, scores });
        id
    }

    pub async fn list_recent(&self, limit: usize) -> Vec<DetectionEvent> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .rev()
            .take(limit)
            .map(|stored| stored.event.clone())
            .collect()
    }

    pub async fn scores_for(&self, history_id: i64) -> Vec<ConfidenceScore> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .find(|stored| stored.event.id == Some(history_id))
            .map(|stored| stored.scores.clone())
            .unwrap_or_default()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.entries.clear();
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }
}
