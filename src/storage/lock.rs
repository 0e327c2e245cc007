//! Lock-file primitive for day-scoped serialization
//!
//! The per-day ticket-number sequence is the only shared mutable resource
//! that needs cross-writer coordination. A [`LockFile`] claims a path with
//! `create_new`, retries with a short poll interval while another writer
//! holds it, and removes the file on drop. Locks left behind by a crashed
//! process are reclaimed after a staleness window.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::{InquiryDeskError, Result};

/// How long a waiter polls before giving up
pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const STALE_AFTER: Duration = Duration::from_secs(30);

/// An exclusive lock held for the lifetime of the value
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Acquire the lock at `path`, waiting up to `wait`
    ///
    /// Timing out maps to [`InquiryDeskError::LockTimeout`], which the
    /// create path surfaces through the same fatal allocation-failure
    /// route as retry exhaustion.
    pub fn acquire(path: impl Into<PathBuf>, wait: Duration) -> Result<Self> {
        let path = path.into();
        let started = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Holder pid, for operators inspecting a stuck lock
                    let _ = write!(file, "{}", std::process::id());
                    return Ok(Self { path });
                },
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    if Self::reclaim_if_stale(&path) {
                        continue;
                    }
                    if started.elapsed() >= wait {
                        return Err(InquiryDeskError::LockTimeout {
                            path: path.display().to_string(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                },
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Acquire with the default wait budget
    pub fn acquire_default(path: impl Into<PathBuf>) -> Result<Self> {
        Self::acquire(path, DEFAULT_WAIT)
    }

    /// Remove a lock whose holder has evidently died
    fn reclaim_if_stale(path: &Path) -> bool {
        let Ok(metadata) = fs::metadata(path) else {
            // Raced with the holder's release; retry the claim
            return true;
        };
        let stale = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|age| age >= STALE_AFTER);
        if stale {
            warn!(path = %path.display(), "reclaiming stale lock file");
            let _ = fs::remove_file(path);
        }
        stale
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %err, "failed to release lock file");
        }
    }
}
