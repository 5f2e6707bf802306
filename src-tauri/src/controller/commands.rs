use tauri::State;

use crate::{
    controller::{check_input as check_text, DetectionController, DetectionReport, InputCheck},
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> DetectionController {
    state.controller.clone()
}

#[tauri::command]
pub fn check_input(text: String) -> InputCheck {
    check_text(&text)
}

#[tauri::command]
pub async fn detect_language(
    state: State<'_, AppState>,
    text: String,
) -> Result<DetectionReport, String> {
    let controller = controller_from_state(&state);
    controller.detect(&text).await.map_err(|e| e.to_string())
}

