use std::fs;
use std::path::Path;

use abacus_core::PersistedState;

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    /// Replace the stored calculator state with the contents of a JSON file.
    pub fn import_state_file(&self, path: &Path) -> Result<PersistedState> {
        let json = fs::read_to_string(path).map_err(|e| {
            StoreError::InvalidData(format!("failed to read {}: {e}", path.display()))
        })?;
        self.import_state_str(&json)
    }

    pub fn import_state_str(&self, json: &str) -> Result<PersistedState> {
        let state = PersistedState::from_json(json)
            .map_err(|e| StoreError::InvalidData(format!("invalid state JSON: {e}")))?;
        self.save_state(&state)?;
        Ok(state)
    }

    /// Write the stored calculator state as pretty JSON.
    pub fn export_state_file(&self, path: &Path) -> Result<()> {
        let json = self.export_state_string()?;
        fs::write(path, json).map_err(|e| {
            StoreError::InvalidData(format!("failed to write {}: {e}", path.display()))
        })
    }

    pub fn export_state_string(&self) -> Result<String> {
        Ok(self.load_state()?.to_json_pretty()?)
    }
}
