// src/reader/handle.rs
use crate::error::Result;
use crate::reader::family_reader::FamilyReader;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, clonable access to one [`FamilyReader`].
///
/// Updates take the write lock for the whole describe/fetch cycle, so readers
/// of the dataset never observe a half-updated reader.
#[derive(Clone)]
pub struct ReaderHandle {
    inner: Arc<RwLock<FamilyReader>>,
}

impl ReaderHandle {
    pub fn new(reader: FamilyReader) -> Self {
        ReaderHandle {
            inner: Arc::new(RwLock::new(reader)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, FamilyReader> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, FamilyReader> {
        self.inner.write()
    }

    /// Run `update_information()` then `update_data()` under one write lock.
    pub fn update(&self) -> Result<()> {
        let mut reader = self.inner.write();
        reader.update_information()?;
        reader.update_data()
    }
}
