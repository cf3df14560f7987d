//! Hot-reloadable holder for the current configuration snapshot.

use std::path::Path;
use std::sync::Arc;

use farlink_core::config::ControlConfig;

use crate::loader::{ConfigLoadError, deserialize_file};
use crate::schema::ControlFile;

/// Load and resolve a control configuration file.
pub fn load_control_config(path: &Path) -> Result<ControlConfig, ConfigLoadError> {
    let file: ControlFile = deserialize_file(path)?;
    file.into_config().map_err(|error| ConfigLoadError::Invalid {
        file: path.to_path_buf(),
        error,
    })
}

/// Owns the snapshot handed to each tick.
///
/// A tick holds its own `Arc`, so a reload never changes the configuration
/// of a tick already in flight.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    current: Arc<ControlConfig>,
    generation: u64,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ControlConfig::default())
    }
}

impl ConfigStore {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            current: Arc::new(config),
            generation: 0,
        }
    }

    /// Load the initial snapshot from a file.
    pub fn open(path: &Path) -> Result<Self, ConfigLoadError> {
        Ok(Self::new(load_control_config(path)?))
    }

    pub fn snapshot(&self) -> Arc<ControlConfig> {
        Arc::clone(&self.current)
    }

    /// Number of successful swaps since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in a new snapshot.
    pub fn replace(&mut self, config: ControlConfig) {
        self.current = Arc::new(config);
        self.generation += 1;
    }

    /// Reload from `path`. On error the previous snapshot stays current.
    pub fn reload(&mut self, path: &Path) -> Result<(), ConfigLoadError> {
        match load_control_config(path) {
            Ok(config) => {
                self.replace(config);
                tracing::info!(
                    path = %path.display(),
                    generation = self.generation,
                    "control configuration reloaded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "control configuration reload failed, keeping previous snapshot"
                );
                Err(e)
            }
        }
    }
}
