use tauri::{AppHandle, Emitter, State};

use crate::{db::ConfidenceScore, history::HistoryEntry, settings::MAX_HISTORY_LIMIT, AppState};

#[tauri::command]
pub async fn get_history(
    state: State<'_, AppState>,
    limit: Option<usize>,
) -> Result<Vec<HistoryEntry>, String> {
    let limit = limit
        .unwrap_or_else(|| state.settings.history().display_limit)
        .min(MAX_HISTORY_LIMIT);
    let events = state
        .history
        .list_recent(limit)
        .await
        .map_err(|e| e.to_string())?;

    Ok(events.iter().map(HistoryEntry::from).collect())
}

#[tauri::command]
pub async fn get_confidence_breakdown(
    state: State<'_, AppState>,
    history_id: i64,
) -> Result<Vec<ConfidenceScore>, String> {
    state
        .history
        .scores_for(history_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn clear_history(state: State<'_, AppState>, app_handle: AppHandle) -> Result<(), String> {
    state.history.clear().await.map_err(|e| e.to_string())?;

    app_handle
        .emit("history-cleared", ())
        .map_err(|e| e.to_string())
}
