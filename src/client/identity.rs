use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;
use uuid::Uuid;

const APP_DIR: &str = "nutrilog";
const USER_ID_FILE: &str = "user_id";
const LAST_DATE_FILE: &str = "last_date";

/// Durable per-installation storage: one opaque identity token and the last
/// seen civil date, each under a fixed file name. There is no real
/// authentication; the token only scopes entries to this installation.
pub struct InstallationStore {
    dir: PathBuf,
}

impl InstallationStore {
    /// `None` when the environment offers no durable data directory; callers
    /// must stay uninitialized and issue no requests in that case.
    pub fn open() -> Option<Self> {
        dirs::data_dir().map(|base| Self {
            dir: base.join(APP_DIR),
        })
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Stable opaque identifier: generated once, returned unchanged on every
    /// later call within this storage scope.
    pub fn user_id(&self) -> anyhow::Result<String> {
        let path = self.dir.join(USER_ID_FILE);
        if let Some(existing) = read_trimmed(&path)? {
            return Ok(existing);
        }
        let id = Uuid::new_v4().to_string();
        self.write(USER_ID_FILE, &id)?;
        Ok(id)
    }

    /// Compare-and-store of the last seen date. Returns whether the stored
    /// value changed, i.e. whether a new day has started since the last call.
    pub fn note_date(&self, today: &str) -> anyhow::Result<bool> {
        let path = self.dir.join(LAST_DATE_FILE);
        if read_trimmed(&path)?.as_deref() == Some(today) {
            return Ok(false);
        }
        self.write(LAST_DATE_FILE, today)?;
        Ok(true)
    }

    /// Forget the stored identity; the next `user_id` call generates a fresh
    /// one, orphaning previously logged entries.
    pub fn clear(&self) -> anyhow::Result<()> {
        let path = self.dir.join(USER_ID_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    fn write(&self, name: &str, value: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.dir.join(name);
        fs::write(&path, value).with_context(|| format!("write {}", path.display()))
    }
}

fn read_trimmed(path: &Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let trimmed = contents.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

pub fn current_user_id() -> Option<String> {
    let store = InstallationStore::open()?;
    match store.user_id() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "could not load or create installation id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_stable_across_calls_and_reopens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InstallationStore::at(dir.path());

        let first = store.user_id().expect("create id");
        let second = store.user_id().expect("reread id");
        assert_eq!(first, second);

        let reopened = InstallationStore::at(dir.path());
        assert_eq!(reopened.user_id().expect("reopen id"), first);
    }

    #[test]
    fn note_date_reports_change_exactly_once_per_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InstallationStore::at(dir.path());

        assert!(store.note_date("2026-08-07").expect("first note"));
        assert!(!store.note_date("2026-08-07").expect("same day"));
        assert!(store.note_date("2026-08-08").expect("next day"));
        assert!(!store.note_date("2026-08-08").expect("same next day"));
    }

    #[test]
    fn clear_forgets_the_identity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InstallationStore::at(dir.path());

        let first = store.user_id().expect("create id");
        store.clear().expect("clear");
        let second = store.user_id().expect("recreate id");
        assert_ne!(first, second);
    }

    #[test]
    fn clear_is_a_no_op_without_an_identity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InstallationStore::at(dir.path());
        store.clear().expect("clear on empty store");
    }
}
