mod catalog;
mod controller;
mod db;
mod detection;
mod history;
mod settings;
mod utils;

use anyhow::anyhow;
use catalog::SampleText;
use controller::{
    commands::{check_input, detect_language},
    DetectionController,
};
use db::Database;
use detection::Detector;
use history::{
    commands::{clear_history, get_confidence_breakdown, get_history},
    HistoryStore, MemoryHistory,
};
use settings::{HistoryBackend, HistorySettings, SettingsStore};
use tauri::{Emitter, Manager, State};

const DATABASE_FILE: &str = "langscope.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

pub(crate) struct AppState {
    pub(crate) controller: DetectionController,
    pub(crate) history: HistoryStore,
    pub(crate) settings: SettingsStore,
}

#[tauri::command]
fn get_supported_languages() -> Vec<&'static str> {
    catalog::supported_language_names()
}

#[tauri::command]
fn get_sample_texts() -> Vec<SampleText> {
    catalog::sample_texts().to_vec()
}

#[tauri::command]
fn get_sample_text(language: String) -> Result<String, String> {
    catalog::sample_text(&language)
        .map(str::to_owned)
        .ok_or_else(|| format!("No example text for {language}"))
}

#[tauri::command]
fn get_settings(state: State<AppState>) -> Result<HistorySettings, String> {
    Ok(state.settings.history())
}

/// Persists history settings. The display limit applies immediately, a
/// backend change takes effect on the next launch.
#[tauri::command]
fn set_history_settings(
    settings: HistorySettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update_history(settings.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("history-settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

fn open_history_store(
    settings: &HistorySettings,
    app_data_dir: &std::path::Path,
) -> anyhow::Result<HistoryStore> {
    let backend = HistoryBackend::from_env().unwrap_or(settings.backend);

    let store = match backend {
        HistoryBackend::Sqlite => {
            let database = Database::new(app_data_dir.join(DATABASE_FILE))?;
            log::info!("History database at {}", database.path().display());
            HistoryStore::Database(database)
        }
        HistoryBackend::Memory => {
            HistoryStore::Memory(MemoryHistory::new(settings.memory_capacity))
        }
    };

    log::info!("Using {} history backend", store.backend_name());
    Ok(store)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    utils::logging::init();

    log::info!("LangScope starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_store = SettingsStore::new(app_data_dir.join(SETTINGS_FILE))?;
                let history = open_history_store(&settings_store.history(), &app_data_dir)?;

                let detector = Detector::from_catalog()?;
                let controller = DetectionController::new(detector, history.clone());

                app.manage(AppState {
                    controller,
                    history,
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            check_input,
            detect_language,
            get_history,
            get_confidence_breakdown,
            clear_history,
            get_supported_languages,
            get_sample_texts,
            get_sample_text,
            get_settings,
            set_history_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
