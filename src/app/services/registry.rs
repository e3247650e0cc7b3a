//! The file registry: named artifacts in insertion order, persisted in full
//! on every mutation.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::app::domain::Artifact;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::storage::{Store, REGISTRY_KEY};

pub struct FileRegistry {
    artifacts: Vec<Artifact>,
    store: Rc<dyn Store>,
}

impl FileRegistry {
    /// Read the persisted registry. Missing or unreadable state yields an
    /// empty registry so startup is never blocked.
    pub fn load(store: Rc<dyn Store>) -> Self {
        let artifacts = match Self::read(store.as_ref()) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                debug!("Starting with an empty registry: {}", e);
                Vec::new()
            }
        };
        Self { artifacts, store }
    }

    fn read(store: &dyn Store) -> Result<Vec<Artifact>> {
        let Some(json) = store.get(REGISTRY_KEY)? else {
            return Ok(Vec::new());
        };
        let mut artifacts: Vec<Artifact> =
            serde_json::from_str(&json).map_err(|e| AppError::StorageCorrupt(e.to_string()))?;

        // Hand-edited or foreign files may repeat a name; last one wins, in
        // the slot of the first.
        let mut deduped: Vec<Artifact> = Vec::with_capacity(artifacts.len());
        for artifact in artifacts.drain(..) {
            if artifact.name.is_empty() {
                continue;
            }
            match deduped.iter_mut().find(|a| a.name == artifact.name) {
                Some(slot) => *slot = artifact,
                None => deduped.push(artifact),
            }
        }
        Ok(deduped)
    }

    pub fn list(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Insert or replace by exact name. A replaced artifact keeps its
    /// position in the listing.
    pub fn upsert(&mut self, artifact: Artifact) {
        match self.artifacts.iter_mut().find(|a| a.name == artifact.name) {
            Some(slot) => {
                debug!("Replacing artifact {}", artifact.name);
                *slot = artifact;
            }
            None => {
                debug!("Adding artifact {}", artifact.name);
                self.artifacts.push(artifact);
            }
        }
        self.persist();
    }

    /// Remove by exact name; returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(idx) = self.artifacts.iter().position(|a| a.name == name) else {
            return false;
        };
        self.artifacts.remove(idx);
        debug!("Removed artifact {}", name);
        self.persist();
        true
    }

    /// Write the full registry. A failed write keeps the in-memory state
    /// and is only reported.
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!("Registry changes are not persisted: {}", e);
        }
    }

    fn try_persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.artifacts)?;
        self.store.set(REGISTRY_KEY, &json)
    }
}
