use crate::errors::AppError;
use crate::models::{AppData, Timeslot};
use crate::state::AppState;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

/// Reads the data file. `Ok(None)` when it does not exist yet.
pub async fn read_data(path: &Path) -> Result<Option<AppData>, AppError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| AppError::storage(path, err)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AppError::storage(path, err)),
    }
}

pub async fn load_data(path: &Path) -> AppData {
    match read_data(path).await {
        Ok(data) => data.unwrap_or_default(),
        Err(err) => {
            error!("failed to load data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload)
        .await
        .map_err(|err| AppError::storage(path, err))
}

/// Appends `slots` to `cat`, keeping the list in time order, and writes the
/// file. Returns how many slots `cat` holds afterwards.
///
/// The in-memory data only changes once the file write succeeded.
pub async fn append_slots(state: &AppState, cat: &str, slots: Vec<Timeslot>) -> Result<usize, AppError> {
    let _gate = state.file_gate.lock().await;
    let mut candidate = state.data.read().await.clone();
    let stored = {
        let entry = candidate.cats.entry(cat.to_string()).or_default();
        entry.extend(slots);
        entry.sort_by_key(|slot| slot.date_slot);
        entry.len()
    };

    persist_data(&state.data_path, &candidate).await?;
    *state.data.write().await = candidate;
    Ok(stored)
}

/// Replaces the in-memory data with the file contents.
///
/// A missing file leaves the current data untouched, and so does a file that
/// fails to parse (the error is returned instead).
pub async fn reload_data(state: &AppState) -> Result<(), AppError> {
    let _gate = state.file_gate.lock().await;
    if let Some(fresh) = read_data(&state.data_path).await? {
        debug!(cats = fresh.cats.len(), "reloaded data file");
        *state.data.write().await = fresh;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("cat_stats_{name}_{}_{nanos}.json", std::process::id()));
        path
    }

    fn slot(at: &str, activity: &str) -> Timeslot {
        Timeslot {
            date_slot: at.parse().unwrap(),
            status: "F".to_string(),
            cam: Some("C2".to_string()),
            activity: Some(activity.to_string()),
        }
    }

    fn sample() -> AppData {
        let mut data = AppData::default();
        data.cats
            .insert("Mochi".to_string(), vec![slot("2024-01-01T08:00:10", "eat")]);
        data
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let path = temp_path("missing");
        assert!(read_data(&path).await.unwrap().is_none());
        assert!(load_data(&path).await.cats.is_empty());
    }

    #[tokio::test]
    async fn persist_then_load() {
        let path = temp_path("roundtrip");
        persist_data(&path, &sample()).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded.cats["Mochi"], sample().cats["Mochi"]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn reload_keeps_data_on_parse_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{not json").unwrap();
        let state = AppState::new(path.clone(), sample());

        assert!(reload_data(&state).await.is_err());
        assert_eq!(state.data.read().await.cats.len(), 1);
        assert!(load_data(&path).await.cats.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn reload_picks_up_new_file_contents() {
        let path = temp_path("reload");
        let state = AppState::new(path.clone(), AppData::default());
        reload_data(&state).await.unwrap();
        assert!(state.data.read().await.cats.is_empty());

        persist_data(&path, &sample()).await.unwrap();
        reload_data(&state).await.unwrap();
        assert!(state.data.read().await.cats.contains_key("Mochi"));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn append_sorts_and_persists() {
        let path = temp_path("append");
        let state = AppState::new(path.clone(), sample());

        let stored = append_slots(
            &state,
            "Mochi",
            vec![slot("2024-01-01T07:59:50", "rest"), slot("2024-01-01T08:00:20", "excrete")],
        )
        .await
        .unwrap();
        assert_eq!(stored, 3);

        let times: Vec<String> = state.data.read().await.cats["Mochi"]
            .iter()
            .map(|slot| slot.date_slot.format("%H:%M:%S").to_string())
            .collect();
        assert_eq!(times, ["07:59:50", "08:00:10", "08:00:20"]);
        assert_eq!(load_data(&path).await.cats["Mochi"].len(), 3);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_untouched() {
        let mut path = std::env::temp_dir();
        path.push(format!("cat_stats_no_such_dir_{}", std::process::id()));
        path.push("timeslots.json");
        let state = AppState::new(path.clone(), sample());

        let err = append_slots(&state, "Mochi", vec![slot("2024-01-01T08:00:20", "excrete")])
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("timeslots.json"));

        let err = append_slots(&state, "Tora", vec![slot("2024-01-01T08:00:20", "eat")])
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let data = state.data.read().await;
        assert_eq!(data.cats["Mochi"].len(), 1);
        assert!(!data.cats.contains_key("Tora"));
    }

    #[tokio::test]
    async fn reload_does_not_block_readers_on_missing_file() {
        let state = AppState::new(temp_path("absent"), sample());
        let reader = state.data.read().await;
        tokio::time::timeout(std::time::Duration::from_secs(1), reload_data(&state))
            .await
            .expect("reload waited on readers")
            .unwrap();
        assert_eq!(reader.cats["Mochi"].len(), 1);
    }
}
