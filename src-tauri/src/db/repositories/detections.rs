use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{format_timestamp, parse_datetime, to_i64},
    models::{ConfidenceScore, DetectionEvent},
};

fn row_to_event(row: &Row) -> Result<DetectionEvent> {
    let timestamp: String = row.get("timestamp")?;

    Ok(DetectionEvent {
        id: row.get("id")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        text: row.get("text")?,
        full_text: row.get("full_text")?,
        detected_language: row.get("detected_language")?,
        confidence: row.get("confidence")?,
    })
}

fn row_to_score(row: &Row) -> Result<ConfidenceScore> {
    Ok(ConfidenceScore {
        history_id: row.get("history_id")?,
        language: row.get("language")?,
        confidence: row.get("confidence")?,
    })
}

impl Database {
    /// Insert a detection and its confidence breakdown in one transaction.
    /// Nothing is kept if any row fails.
    pub async fn insert_detection(
        &self,
        event: &DetectionEvent,
        scores: &[ConfidenceScore],
    ) -> Result<i64> {
        let record = event.clone();
        let scores = scores.to_vec();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO detection_history (timestamp, text, full_text, detected_language, confidence)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    format_timestamp(&record.timestamp),
                    record.text,
                    record.full_text,
                    record.detected_language,
                    record.confidence,
                ],
            )
            .context("failed to insert detection")?;

            let history_id = tx.last_insert_rowid();

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO confidence_scores (history_id, language, confidence)
                     VALUES (?1, ?2, ?3)",
                )?;
                for score in &scores {
                    stmt.execute(params![history_id, score.language, score.confidence])
                        .with_context(|| {
                            format!("failed to insert confidence score for {}", score.language)
                        })?;
                }
            }

            tx.commit().context("failed to commit detection")?;
            Ok(history_id)
        })
        .await
    }

    /// Most recent detections first, at most `limit` rows.
    pub async fn list_recent_detections(&self, limit: usize) -> Result<Vec<DetectionEvent>> {
        let limit = to_i64(limit)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, timestamp, text, full_text, detected_language, confidence
                 FROM detection_history
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut events = Vec::new();
            while let Some(row) = rows.next()? {
                events.push(row_to_event(row)?);
            }

            Ok(events)
        })
        .await
    }

    pub async fn get_confidence_scores(&self, history_id: i64) -> Result<Vec<ConfidenceScore>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT history_id, language, confidence
                 FROM confidence_scores
                 WHERE history_id = ?1
                 ORDER BY confidence DESC, id ASC",
            )?;

            let mut rows = stmt.query(params![history_id])?;
            let mut scores = Vec::new();
            while let Some(row) = rows.next()? {
                scores.push(row_to_score(row)?);
            }

            Ok(scores)
        })
        .await
    }

    /// Delete every detection. Scores go first so no child row ever points at
    /// a missing parent.
    pub async fn clear_detection_history(&self) -> Result<()> {
        self.execute(|conn| {
            let tx = conn.transaction()?;

            tx.execute("DELETE FROM confidence_scores", [])
                .context("failed to delete confidence scores")?;
            tx.execute("DELETE FROM detection_history", [])
                .context("failed to delete detection history")?;

            tx.commit()?;
            Ok(())
        })
        .await
    }
}
