// src/utils/lock.rs
use std::fs::File;
use std::io;
use std::path::Path;

/// Shared advisory lock held for the lifetime of the guard.
///
/// A producer holding an exclusive lock while it writes blocks acquisition
/// until the write finishes.
pub struct SharedLock {
    file: File,
}

impl SharedLock {
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;
        Ok(SharedLock { file })
    }
}

impl Drop for SharedLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_locks_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.e");
        std::fs::write(&path, b"").unwrap();

        let a = SharedLock::acquire(&path).unwrap();
        let b = SharedLock::acquire(&path).unwrap();
        drop(a);
        drop(b);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SharedLock::acquire(&dir.path().join("missing.e")).is_err());
    }
}
