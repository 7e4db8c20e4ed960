use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::{Mutex, RwLock};

/// Shared handle to the timeslot store.
///
/// `data` is what requests read. `file_gate` serializes everything that
/// touches the data file, so an upload and a reload never interleave.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<RwLock<AppData>>,
    pub file_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(RwLock::new(data)),
            file_gate: Arc::new(Mutex::new(())),
        }
    }
}
