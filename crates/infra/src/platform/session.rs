//! File cache for platform session cookies

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ticketmail_core::utils::file_safe_name;
use ticketmail_domain::constants::SESSION_CACHE_MINUTES;
use ticketmail_domain::Result;

use crate::atomic_file::write_atomic;
use crate::errors::to_domain;

#[derive(Debug, Serialize, Deserialize)]
struct CachedSession {
    base_url: String,
    username: String,
    cookie_header: String,
    saved_at: DateTime<Utc>,
}

/// Cookies of the last successful login, reused while they are fresh
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
    max_age: Duration,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), max_age: Duration::minutes(SESSION_CACHE_MINUTES) }
    }

    /// Cache file under the system temp directory, one per organisation.
    pub fn for_organization(organization: &str) -> Self {
        let file = format!("session-{}.json", file_safe_name(organization));
        Self::new(std::env::temp_dir().join(".ticketmail").join(file))
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cookie header saved for this site and user, unless it is older than
    /// the maximum age. Unreadable caches count as missing.
    pub fn load(&self, base_url: &str, username: &str, now: DateTime<Utc>) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let cached: CachedSession = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(err) => {
                tracing::debug!(error = %err, path = %self.path.display(), "session_cache.unreadable");
                return None;
            }
        };

        let fresh = now.signed_duration_since(cached.saved_at) < self.max_age;
        if cached.base_url != base_url || cached.username != username || !fresh {
            return None;
        }
        Some(cached.cookie_header)
    }

    pub fn store(
        &self,
        base_url: &str,
        username: &str,
        cookie_header: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            create_private_dir(dir).map_err(to_domain)?;
        }
        let cached = CachedSession {
            base_url: base_url.to_string(),
            username: username.to_string(),
            cookie_header: cookie_header.to_string(),
            saved_at: now,
        };
        let json = serde_json::to_vec_pretty(&cached).map_err(to_domain)?;
        write_atomic(&self.path, &json).map_err(to_domain)?;
        tracing::debug!(path = %self.path.display(), "session_cache.stored");
        Ok(())
    }

    /// Forget the cached session, e.g. after the platform rejected it.
    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                tracing::warn!(error = %err, path = %self.path.display(), "session_cache.remove_failed");
            }
        }
    }
}

// Cookies are credentials; the cache directory is owner-only on unix
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}
