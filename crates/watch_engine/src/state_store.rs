use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use watch_core::WatermarkState;
use watch_logging::{watch_info, watch_warn};

use crate::persist::{AtomicFileWriter, PersistError, StagedWrite};

/// Durable per-category watermarks in a single JSON file.
#[derive(Debug, Clone)]
pub struct StateStore {
    writer: AtomicFileWriter,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }

    /// Missing, unreadable and corrupt files all load as empty state.
    pub fn load(&self) -> WatermarkState {
        let path = self.path();
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                watch_info!("No state file at {:?}; starting fresh", path);
                return WatermarkState::new();
            }
            Err(err) => {
                watch_warn!("Failed to read state from {:?}: {}", path, err);
                return WatermarkState::new();
            }
        };

        match WatermarkState::from_json(&content) {
            Ok(state) => {
                watch_info!("Loaded {} watermark(s) from {:?}", state.len(), path);
                state
            }
            Err(err) => {
                watch_warn!(
                    "State file {:?} is corrupt ({}); treating every category as a first run",
                    path,
                    err
                );
                WatermarkState::new()
            }
        }
    }

    /// Writes the serialized state to a temp file without replacing the real one.
    pub fn stage(&self, state: &WatermarkState) -> Result<StagedWrite, PersistError> {
        let content = state.to_pretty_json()?;
        self.writer.stage(&content)
    }

    pub fn save(&self, state: &WatermarkState) -> Result<(), PersistError> {
        let path = self.stage(state)?.commit()?;
        watch_info!("Saved {} watermark(s) to {:?}", state.len(), path);
        Ok(())
    }
}
