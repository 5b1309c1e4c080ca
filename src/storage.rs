//! Persistent storage for the selected mode.
//!
//! Uses internal flash via the `sequential-storage` crate: a key-value
//! map over a reserved page range holding a single 1-byte item, the
//! catalog index. `sequential-storage` takes care of wear levelling and
//! garbage collection.
//!
//! Storage is best-effort. A missing or unreadable value loads as 0 and a
//! failed write is only logged: losing the selection costs the user one
//! button press, nothing more.

use core::future::Future;
use core::ops::Range;

use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use crate::error::Error;

/// Key of the mode item in the map storage.
const KEY_MODE: u8 = 0x01;

/// Scratch buffer size for map operations (item header + key + value).
const SCRATCH_SIZE: usize = 64;

/// Mode persistence collaborator.
pub trait ModeStore {
    /// Previously saved index, or 0 when there is none or it can't be read.
    fn load(&mut self) -> impl Future<Output = u8>;

    /// Save `index`. Failures are not reported.
    fn save(&mut self, index: u8) -> impl Future<Output = ()>;
}

/// [`ModeStore`] backed by a NOR flash range.
pub struct FlashModeStore<F> {
    flash: F,
    range: Range<u32>,
}

impl<F: NorFlash> FlashModeStore<F> {
    /// `range` must be page aligned and span at least two erase pages.
    pub fn new(flash: F, range: Range<u32>) -> Self {
        Self { flash, range }
    }

    /// Read the stored byte, `Ok(None)` if it was never written.
    pub async fn fetch(&mut self) -> Result<Option<u8>, Error> {
        let mut buf = [0u8; SCRATCH_SIZE];
        let item = fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buf,
            &KEY_MODE,
        )
        .await?;
        Ok(item.and_then(|data| data.first().copied()))
    }

    /// Write the byte.
    pub async fn store(&mut self, index: u8) -> Result<(), Error> {
        let mut buf = [0u8; SCRATCH_SIZE];
        let value = [index];
        store_item::<u8, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut buf,
            &KEY_MODE,
            &&value[..],
        )
        .await?;
        Ok(())
    }

    /// Give the flash back (tests inspect it).
    pub fn into_inner(self) -> F {
        self.flash
    }
}

impl<F: NorFlash> ModeStore for FlashModeStore<F> {
    async fn load(&mut self) -> u8 {
        match self.fetch().await {
            Ok(Some(index)) => {
                info!("Loaded mode {} from flash", index);
                index
            }
            Ok(None) => {
                info!("No saved mode in flash");
                0
            }
            Err(e) => {
                error!("Flash read error: {}", e);
                0
            }
        }
    }

    async fn save(&mut self, index: u8) {
        match self.store(index).await {
            Ok(()) => debug!("Saved mode {} to flash", index),
            Err(e) => error!("Flash write error: {}", e),
        }
    }
}
