//! Local session store.
//!
//! The signed-in operator is kept in a small JSON file in the data directory
//! so it survives restarts. Reading it is the only way the restock workflow
//! learns who is submitting.

use std::path::{Path, PathBuf};

use anyhow::Context;

use tillpoint_restock::{Operator, SessionProvider};

#[derive(Debug, Clone)]
pub struct LocalSessionStore {
    path: PathBuf,
}

impl LocalSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `operator` as the current session.
    pub fn save(&self, operator: &Operator) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session directory at {:?}", parent))?;
        }
        let body = serde_json::to_vec_pretty(operator).context("failed to encode session")?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("failed to write session file at {:?}", self.path))?;
        tracing::info!(operator = %operator.id, "session saved");
        Ok(())
    }

    /// Current session; `Ok(None)` when nobody is signed in.
    pub fn load(&self) -> anyhow::Result<Option<Operator>> {
        let body = match std::fs::read(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read session file at {:?}", self.path));
            }
        };
        let operator = serde_json::from_slice(&body)
            .with_context(|| format!("corrupt session file at {:?}", self.path))?;
        Ok(Some(operator))
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove session file at {:?}", self.path))
            }
        }
    }
}

impl SessionProvider for LocalSessionStore {
    fn current_operator(&self) -> Option<Operator> {
        match self.load() {
            Ok(operator) => operator,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "session unreadable, treating as signed out");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillpoint_core::UserId;
    use uuid::Uuid;

    fn temp_store() -> LocalSessionStore {
        let dir = std::env::temp_dir().join(format!("tillpoint-session-{}", Uuid::now_v7()));
        LocalSessionStore::new(dir.join("session.json"))
    }

    #[test]
    fn missing_file_means_signed_out() {
        let store = temp_store();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.current_operator(), None);
    }

    #[test]
    fn save_load_clear() {
        let store = temp_store();
        let operator = Operator {
            id: UserId::new(),
            name: "Dana".to_string(),
        };

        store.save(&operator).unwrap();
        assert_eq!(store.current_operator(), Some(operator));

        store.clear().unwrap();
        assert_eq!(store.current_operator(), None);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let store = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"{not json").unwrap();

        assert!(store.load().is_err());
        assert_eq!(store.current_operator(), None);
    }
}
