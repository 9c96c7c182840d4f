//! External system-configuration store.
//!
//! The HMI only sequences calls into the store; what "apply" and
//! "persist" mean is up to the implementation (the firmware pushes the
//! config to the control loops and writes it to flash).

use crate::error::StoreError;
use crate::model::SystemConfig;

pub trait ConfigStore {
    /// Current live configuration (source of truth).
    fn get_config(&self) -> SystemConfig;

    /// Check a candidate configuration without applying it.
    fn validate_config(&self, config: &SystemConfig) -> Result<(), StoreError>;

    /// Make `config` the live configuration.
    fn apply_config_runtime(&mut self, config: &SystemConfig) -> Result<(), StoreError>;

    /// Write the live configuration to non-volatile memory.
    fn persist_config(&mut self) -> Result<(), StoreError>;
}

/// Validate → apply → persist. Stops at the first failing step.
pub fn commit<S: ConfigStore + ?Sized>(store: &mut S, config: &SystemConfig) -> Result<(), StoreError> {
    store.validate_config(config)?;
    store.apply_config_runtime(config)?;
    store.persist_config()
}
