//! Flash-backed configuration store.
//!
//! The live [`SystemConfig`] is cached in RAM; `persist_config` writes it
//! as a single `sequential-storage` map item in the last NVMC pages, which
//! takes care of wear levelling and page GC.
//!
//! The HMI calls the store synchronously from its poll loop, so the async
//! flash operations are driven to completion with `block_on`. NVMC writes
//! stall the CPU anyway.

use climate_hmi::config::{EditLimits, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use climate_hmi::model::{SystemConfig, MAX_RECORD_SIZE};
use climate_hmi::store::ConfigStore;
use climate_hmi::StoreError;
use defmt::{error, info, warn};
use embassy_futures::block_on;
use embedded_storage_async::nor_flash::NorFlash;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Map key of the configuration record.
const KEY_SYSTEM_CONFIG: u8 = 0x01;

/// Scratch size for `sequential-storage` (record plus item header).
const SCRATCH_SIZE: usize = MAX_RECORD_SIZE + 32;

pub struct FlashConfigStore<F> {
    flash: F,
    live: SystemConfig,
    limits: EditLimits,
}

impl<F: NorFlash> FlashConfigStore<F> {
    /// Load the stored config, falling back to defaults when the region is
    /// empty, unreadable or holds an invalid record.
    pub fn load(mut flash: F, limits: EditLimits) -> Self {
        let live = match block_on(fetch(&mut flash)) {
            Ok(Some(cfg)) if cfg.check(&limits).is_ok() => {
                info!("Config: loaded from flash");
                cfg
            }
            Ok(Some(_)) => {
                warn!("Config: stored record out of limits, using defaults");
                SystemConfig::default()
            }
            Ok(None) => {
                info!("Config: none stored, using defaults");
                SystemConfig::default()
            }
            Err(e) => {
                error!("Config: load failed: {:?}", e);
                SystemConfig::default()
            }
        };
        Self { flash, live, limits }
    }
}

async fn fetch<F: NorFlash>(flash: &mut F) -> Result<Option<SystemConfig>, StoreError> {
    let mut buf = [0u8; SCRATCH_SIZE];
    let item = sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_SYSTEM_CONFIG,
    )
    .await
    .map_err(|e| {
        error!("Flash read error: {:?}", defmt::Debug2Format(&e));
        StoreError::Corrupt
    })?;

    item.map(SystemConfig::deserialize).transpose()
}

async fn store<F: NorFlash>(flash: &mut F, config: &SystemConfig) -> Result<(), StoreError> {
    let mut record = [0u8; MAX_RECORD_SIZE];
    let len = config.serialize(&mut record);
    if len == 0 {
        return Err(StoreError::Persist);
    }
    let item: &[u8] = &record[..len];

    let mut buf = [0u8; SCRATCH_SIZE];
    sequential_storage::map::store_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_SYSTEM_CONFIG,
        &item,
    )
    .await
    .map_err(|e| {
        error!("Flash write error: {:?}", defmt::Debug2Format(&e));
        StoreError::Persist
    })
}

impl<F: NorFlash> ConfigStore for FlashConfigStore<F> {
    fn get_config(&self) -> SystemConfig {
        self.live.clone()
    }

    fn validate_config(&self, config: &SystemConfig) -> Result<(), StoreError> {
        config.check(&self.limits)
    }

    fn apply_config_runtime(&mut self, config: &SystemConfig) -> Result<(), StoreError> {
        self.live = config.clone();
        info!("Config: applied");
        Ok(())
    }

    fn persist_config(&mut self) -> Result<(), StoreError> {
        block_on(store(&mut self.flash, &self.live))?;
        info!("Config: saved to flash");
        Ok(())
    }
}
