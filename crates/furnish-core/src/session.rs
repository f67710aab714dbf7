//! Session context: where the bearer credential lives and how it is read
//!
//! Every reader goes through [`SessionContext::credential`], which hits the
//! underlying store on each call. Nothing caches the credential, so a
//! sign-out elsewhere is observed by the next request.

use parking_lot::RwLock;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Opaque bearer credential
///
/// Presence is all that is checked client-side; the value is never
/// validated, decoded or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, returning `None` for the empty string
    ///
    /// The token is kept byte-for-byte; whitespace is part of it.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Client-local slot holding at most one credential
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Current token, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> crate::Result<Option<String>>;

    /// Replace the stored token
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> crate::Result<()>;

    /// Remove the stored token
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be cleared.
    fn clear(&self) -> crate::Result<()>;
}

/// In-memory store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> crate::Result<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &str) -> crate::Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Store persisting the token in a single file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store backed by `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> crate::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(mut contents) => {
                // Editors append a newline; nothing else is stripped.
                if contents.ends_with('\n') {
                    contents.pop();
                    if contents.ends_with('\r') {
                        contents.pop();
                    }
                }
                Ok(Some(contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        debug!(path = %self.path.display(), "Stored credential");
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Explicit session handle shared by the token gate and resource clients
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
}

impl SessionContext {
    /// Session over the given store
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Session over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    /// Current credential, read from the store on every call
    ///
    /// An unreadable store counts as signed out.
    pub fn credential(&self) -> Option<Credential> {
        match self.store.load() {
            Ok(token) => token.and_then(Credential::new),
            Err(e) => {
                debug!(error = %e, "Credential store unreadable, treating as signed out");
                None
            }
        }
    }

    /// Persist a new credential
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty token, or the store's error.
    pub fn sign_in(&self, token: &str) -> crate::Result<Credential> {
        let credential = Credential::new(token)
            .ok_or_else(|| crate::Error::validation("token", "token must not be empty"))?;
        self.store.save(credential.expose())?;
        Ok(credential)
    }

    /// Forget the stored credential
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be cleared.
    pub fn sign_out(&self) -> crate::Result<()> {
        self.store.clear()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_empty_credential_is_absent() {
        assert!(Credential::new("").is_none());
        assert_eq!(Credential::new("   ").unwrap().expose(), "   ");
        assert_eq!(Credential::new(" abc ").unwrap().bearer(), "Bearer  abc ");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("s3cr3t").unwrap();

        assert!(!format!("{credential:?}").contains("s3cr3t"));
        assert_eq!(credential.bearer(), "Bearer s3cr3t");
    }

    #[test]
    fn test_session_reads_store_on_every_call() {
        let store = Arc::new(MemoryCredentialStore::with_token("first"));
        let session = SessionContext::new(store.clone());

        assert_eq!(session.credential().unwrap().expose(), "first");

        store.save("second").unwrap();
        assert_eq!(session.credential().unwrap().expose(), "second");

        store.clear().unwrap();
        assert!(session.credential().is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionContext::in_memory();

        assert!(session.sign_in("").is_err());
        assert!(session.credential().is_none());

        session.sign_in("token-1").unwrap();
        assert_eq!(session.credential().unwrap().expose(), "token-1");

        session.sign_out().unwrap();
        assert!(session.credential().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load().unwrap(), None);

        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap(), Some("abc123".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_strips_one_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let session = SessionContext::new(Arc::new(FileCredentialStore::new(&path)));

        std::fs::write(&path, "abc123\n").unwrap();
        assert_eq!(session.credential().unwrap().expose(), "abc123");

        std::fs::write(&path, " abc123 \n\n").unwrap();
        assert_eq!(session.credential().unwrap().expose(), " abc123 \n");

        std::fs::write(&path, "\n").unwrap();
        assert!(session.credential().is_none());
    }
}
