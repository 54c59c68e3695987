use std::io;
use std::path::{Path, PathBuf};

/// Persists the single bearer token the client holds. The token lives in one
/// file under the data directory; its presence is the sole signal of
/// "authenticated". Each request reads it fresh at call time.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the persisted token, if any. An empty or unreadable file counts
    /// as no token.
    pub fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    /// Remove the persisted token. A missing file is not an error; logout
    /// must succeed even with no prior session.
    pub fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove token file: {err}");
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
