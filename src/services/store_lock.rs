// src/services/store_lock.rs
//
// Cross-process exclusion for the settings store. The lock is a file created
// with exclusive-create semantics; whoever creates it owns the store until
// the guard is dropped. Abandoned locks are only broken while holding a
// second, short-lived breaker file, and staleness is re-checked under it.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::error::{Result, StoreError};
use crate::constants::store::LOCK_RETRY_MS;

#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Block until the lock file can be created or `timeout` runs out.
    /// A lock file older than `stale_after` is treated as abandoned.
    pub fn acquire(path: &Path, timeout: Duration, stale_after: Duration) -> Result<Self> {
        let deadline = Instant::now() + timeout;

        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    // owner pid is informational only
                    let _ = writeln!(file, "{}", std::process::id());
                    debug!(path = %path.display(), "acquired settings lock");
                    return Ok(Self {
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if Self::is_stale(path, stale_after) && Self::break_stale(path, stale_after)? {
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(StoreError::LockTimeout(path.to_path_buf()));
                    }
                    thread::sleep(Duration::from_millis(LOCK_RETRY_MS));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // Returns true when the abandoned lock was removed by this call
    fn break_stale(path: &Path, stale_after: Duration) -> Result<bool> {
        let breaker = Self::breaker_path(path);
        let _breaker = match OpenOptions::new().write(true).create_new(true).open(&breaker) {
            Ok(_) => BreakerGuard(breaker),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                // a breaker left behind by a crashed process
                if Self::is_stale(&breaker, stale_after) {
                    warn!(path = %breaker.display(), "removing abandoned lock breaker");
                    remove_if_present(&breaker)?;
                }
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        // another waiter may have replaced the lock since it was checked
        if !Self::is_stale(path, stale_after) {
            return Ok(false);
        }
        warn!(path = %path.display(), "removing abandoned settings lock");
        remove_if_present(path)?;
        Ok(true)
    }

    fn breaker_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".break");
        path.with_file_name(name)
    }

    fn is_stale(path: &Path, stale_after: Duration) -> bool {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age > stale_after)
            .unwrap_or(false)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release settings lock");
        } else {
            debug!(path = %self.path.display(), "released settings lock");
        }
    }
}

struct BreakerGuard(PathBuf);

impl Drop for BreakerGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.0) {
            warn!(path = %self.0.display(), error = %e, "failed to remove lock breaker");
        }
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::time::SystemTime;
    use tempfile::tempdir;

    const LONG: Duration = Duration::from_secs(30);

    #[test]
    fn test_acquire_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.lock");

        {
            let lock = StoreLock::acquire(&path, Duration::from_millis(100), LONG).unwrap();
            assert!(lock.path().exists());
        }
        assert!(!path.exists());

        // can be taken again after release
        let _lock = StoreLock::acquire(&path, Duration::from_millis(100), LONG).unwrap();
    }

    #[test]
    fn test_times_out_while_held() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.lock");

        let _held = StoreLock::acquire(&path, Duration::from_millis(100), LONG).unwrap();
        let second = StoreLock::acquire(&path, Duration::from_millis(60), LONG);
        assert!(matches!(second, Err(StoreError::LockTimeout(_))));
    }

    #[test]
    fn test_breaks_stale_lock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.lock");
        fs::write(&path, "12345\n").unwrap();
        thread::sleep(Duration::from_millis(20));

        let lock = StoreLock::acquire(&path, Duration::from_millis(100), Duration::ZERO).unwrap();
        let owner = fs::read_to_string(lock.path()).unwrap();
        assert_eq!(owner.trim(), std::process::id().to_string());
    }

    #[test]
    fn test_serializes_concurrent_writers() {
        let dir = tempdir().unwrap();
        let lock_path = Arc::new(dir.path().join("settings.lock"));
        let counter_path = Arc::new(dir.path().join("counter"));
        fs::write(counter_path.as_path(), "0").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock_path = Arc::clone(&lock_path);
                let counter_path = Arc::clone(&counter_path);
                thread::spawn(move || {
                    for _ in 0..10 {
                        let _lock =
                            StoreLock::acquire(&lock_path, Duration::from_secs(10), LONG).unwrap();
                        let value: u32 = fs::read_to_string(counter_path.as_path())
                            .unwrap()
                            .parse()
                            .unwrap();
                        fs::write(counter_path.as_path(), (value + 1).to_string()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let total = fs::read_to_string(counter_path.as_path()).unwrap();
        assert_eq!(total, "40");
    }

    fn write_aged_lock(path: &Path, age: Duration) {
        fs::write(path, "12345\n").unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    #[test]
    fn test_contended_stale_lock_has_one_owner() {
        let dir = tempdir().unwrap();
        let path = Arc::new(dir.path().join("settings.lock"));
        let holders = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        for _ in 0..40 {
            write_aged_lock(&path, Duration::from_secs(60));
            let barrier = Arc::new(Barrier::new(8));

            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let path = Arc::clone(&path);
                    let holders = Arc::clone(&holders);
                    let overlaps = Arc::clone(&overlaps);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        let _lock =
                            StoreLock::acquire(&path, Duration::from_secs(5), LONG).unwrap();
                        if holders.fetch_add(1, Ordering::SeqCst) != 0 {
                            overlaps.fetch_add(1, Ordering::SeqCst);
                        }
                        thread::sleep(Duration::from_millis(2));
                        holders.fetch_sub(1, Ordering::SeqCst);
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
            assert!(!path.exists());
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert!(!StoreLock::breaker_path(&path).exists());
    }

    #[test]
    fn test_fresh_lock_survives_stale_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.lock");
        let _held = StoreLock::acquire(&path, Duration::from_millis(100), LONG).unwrap();

        // the lock is fresh, so a breaker pass leaves it alone
        assert!(!StoreLock::break_stale(&path, LONG).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_abandoned_breaker_is_cleared() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.lock");
        write_aged_lock(&path, Duration::from_secs(60));
        write_aged_lock(&StoreLock::breaker_path(&path), Duration::from_secs(60));

        let lock = StoreLock::acquire(&path, Duration::from_secs(1), LONG).unwrap();
        let owner = fs::read_to_string(lock.path()).unwrap();
        assert_eq!(owner.trim(), std::process::id().to_string());
        assert!(!StoreLock::breaker_path(&path).exists());
    }
}
