//! Configuration edit session - the menu's working copy.
//!
//! Lifecycle:
//! 1. `begin` snapshots the store's live config when the menu opens.
//! 2. Edit screens mutate the copy through `working_mut`.
//! 3. `save` pushes it through validate → apply → persist; on failure the
//!    copy is kept untouched so the user can retry.
//! 4. `discard` drops the copy and re-fetches the live config.

use crate::error::StoreError;
use crate::model::SystemConfig;
use crate::store::{self, ConfigStore};

#[derive(Clone, Debug, Default)]
pub struct ConfigEditSession {
    working: SystemConfig,
    dirty: bool,
}

impl ConfigEditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session from the live configuration.
    pub fn begin<S: ConfigStore + ?Sized>(&mut self, store: &S) {
        self.working = store.get_config();
        self.dirty = false;
    }

    /// Throw away pending edits and reload from the store.
    pub fn discard<S: ConfigStore + ?Sized>(&mut self, store: &S) {
        if self.dirty {
            info!("Session: discarding pending edits");
        }
        self.begin(store);
    }

    /// Commit the working copy. The copy is left as-is on failure.
    pub fn save<S: ConfigStore + ?Sized>(&mut self, store: &mut S) -> Result<(), StoreError> {
        match store::commit(store, &self.working) {
            Ok(()) => {
                info!("Session: configuration saved");
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                warn!("Session: save failed: {:?}", e);
                Err(e)
            }
        }
    }

    pub fn working(&self) -> &SystemConfig {
        &self.working
    }

    /// Mutable access; marks the session dirty.
    pub fn working_mut(&mut self) -> &mut SystemConfig {
        self.dirty = true;
        &mut self.working
    }

    /// `true` once an edit screen stored something since `begin`/`save`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
