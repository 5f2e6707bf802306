//! Detection history with two interchangeable backends: an in-process list
//! and the SQLite database.

pub mod commands;
mod memory;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::controller::format_percent;
use crate::db::{ConfidenceScore, Database, DetectionEvent};
use crate::log_info;

pub use memory::MemoryHistory;

const ENABLE_LOGS: bool = true;

#[derive(Clone)]
pub enum HistoryStore {
    Memory(MemoryHistory),
    Database(Database),
}

impl HistoryStore {
    /// Append one detection with its full confidence breakdown.
    pub async fn record(&self, event: &DetectionEvent, scores: &[ConfidenceScore]) -> Result<i64> {
        let id = match self {
            HistoryStore::Memory(memory) => memory.record(event, scores).await,
            HistoryStore::Database(db) => db.insert_detection(event, scores).await?,
        };
        log_info!(
            "Recorded detection {id} ({}, {} scores)",
            event.detected_language,
            scores.len()
        );
        Ok(id)
    }

    pub async fn list_recent(&self, limit: usize) -> Result<Vec<DetectionEvent>> {
        match self {
            HistoryStore::Memory(memory) => Ok(memory.list_recent(limit).await),
            HistoryStore::Database(db) => db.list_recent_detections(limit).await,
        }
    }

    pub async fn scores_for(&self, history_id: i64) -> Result<Vec<ConfidenceScore>> {
        match self {
            HistoryStore::Memory(memory) => Ok(memory.scores_for(history_id).await),
            HistoryStore::Database(db) => db.get_confidence_scores(history_id).await,
        }
    }

    pub async fn clear(&self) -> Result<()> {
        match self {
            HistoryStore::Memory(memory) => memory.clear().await,
            HistoryStore::Database(db) => db.clear_detection_history().await?,
        }
        log_info!("Detection history cleared");
        Ok(())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            HistoryStore::Memory(_) => "memory",
            HistoryStore::Database(_) => "sqlite",
        }
    }
}

/// One row of the sidebar history table.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Option<i64>,
    pub timestamp: String,
    pub text: String,
    pub detected_language: String,
    pub confidence: String,
}

impl From<&DetectionEvent> for HistoryEntry {
    fn from(event: &DetectionEvent) -> Self {
        Self {
            id: event.id,
            timestamp: event
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            text: event.text.clone(),
            detected_language: event.detected_language.clone(),
            confidence: format_percent(event.confidence),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn stores() -> (tempfile::TempDir, Vec<HistoryStore>) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("history.sqlite3")).unwrap();
        (
            dir,
            vec![
                HistoryStore::Memory(MemoryHistory::new(100)),
                HistoryStore::Database(db),
            ],
        )
    }

    #[tokio::test]
    async fn backends_share_the_same_contract() {
        let (_dir, stores) = stores();

        for store in stores {
            let event = DetectionEvent::new(
                "Ciao! Come stai oggi? Spero che tu stia bene.",
                Some("Italian"),
                0.93,
                Utc::now(),
            );
            let scores = vec![
                ConfidenceScore::new("Spanish", 0.05),
                ConfidenceScore::new("Italian", 0.93),
                ConfidenceScore::new("Portuguese", 0.02),
            ];

            let id = store.record(&event, &scores).await.unwrap();
            let listed = store.list_recent(5).await.unwrap();
            assert_eq!(listed.len(), 1, "{}", store.backend_name());
            assert_eq!(listed[0].detected_language, "Italian");
            assert_eq!(listed[0].confidence, 0.93);
            let stored: Vec<_> = store
                .scores_for(id)
                .await
                .unwrap()
                .into_iter()
                .map(|score| score.language)
                .collect();
            assert_eq!(stored, ["Italian", "Spanish", "Portuguese"], "{}", store.backend_name());

            store.clear().await.unwrap();
            assert!(store.list_recent(5).await.unwrap().is_empty());
            assert!(store.scores_for(id).await.unwrap().is_empty());
        }
    }

    #[test]
    fn history_entry_formats_for_display() {
        let mut event = DetectionEvent::new(&"a".repeat(60), Some("English"), 0.97314, Utc::now());
        event.id = Some(7);

        let entry = HistoryEntry::from(&event);
        assert_eq!(entry.id, Some(7));
        assert_eq!(entry.confidence, "97.31%");
        assert_eq!(entry.text.chars().count(), 53);
        assert_eq!(entry.timestamp.len(), "2024-01-01 00:00:00".len());
    }
}
