//! The session manager: who is logged in right now.
//!
//! A [`Session`] owns its backing [`TokenStore`] and keeps the current token
//! in memory. It never inspects the token; the server issued it and the
//! server is the only party that can judge it.

use tracing::debug;

use crate::store::{StoreError, TokenStore};

/// Key of the token record in durable storage. Named after the value it
/// holds so the session file stays self-describing.
const TOKEN_KEY: &str = "jwtToken";

/// Client-side login state.
///
/// Invariant: after any call returns, the in-memory token equals the durable
/// record. Mutations write the record first and update memory only once the
/// write succeeded, so a failed write leaves both sides unchanged.
#[derive(Debug)]
pub struct Session<S: TokenStore> {
    store: S,
    token: Option<String>,
}

impl<S: TokenStore> Session<S> {
    /// Restore the session from durable storage.
    pub fn initialize(store: S) -> Result<Self, StoreError> {
        let token = store.get(TOKEN_KEY)?;
        match &token {
            Some(_) => debug!("Restored existing session"),
            None => debug!("No stored session; starting anonymous"),
        }

        Ok(Self { store, token })
    }

    /// Record a successful login. Replaces any previous session.
    pub fn login(&mut self, token: String) -> Result<(), StoreError> {
        debug_assert!(!token.is_empty());

        self.store.set(TOKEN_KEY, &token)?;
        self.token = Some(token);
        Ok(())
    }

    /// Forget the session. Safe to call when already logged out.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.store.delete(TOKEN_KEY)?;
        self.token = None;
        Ok(())
    }

    /// The current token, if any.
    pub fn current_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileTokenStore, MemoryTokenStore};
    use tempfile::TempDir;

    #[test]
    fn test_fresh_store_is_anonymous() {
        let session = Session::initialize(MemoryTokenStore::new()).unwrap();

        assert_eq!(session.current_token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_sets_token_and_record() {
        let mut session = Session::initialize(MemoryTokenStore::new()).unwrap();

        session.login("tok-1".to_string()).unwrap();

        assert_eq!(session.current_token(), Some("tok-1"));
        assert!(session.is_authenticated());
        assert_eq!(
            session.store.get(TOKEN_KEY).unwrap().as_deref(),
            Some("tok-1")
        );
    }

    #[test]
    fn test_logout_clears_any_state() {
        let mut session = Session::initialize(MemoryTokenStore::new()).unwrap();
        session.login("tok-1".to_string()).unwrap();

        session.logout().unwrap();

        assert_eq!(session.current_token(), None);
        assert!(!session.is_authenticated());
        assert_eq!(session.store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut session = Session::initialize(MemoryTokenStore::new()).unwrap();

        session.logout().unwrap();
        session.logout().unwrap();

        assert_eq!(session.current_token(), None);
    }

    #[test]
    fn test_relogin_replaces_token() {
        let mut session = Session::initialize(MemoryTokenStore::new()).unwrap();

        session.login("tok-1".to_string()).unwrap();
        session.login("tok-2".to_string()).unwrap();

        assert_eq!(session.current_token(), Some("tok-2"));
        assert_eq!(
            session.store.get(TOKEN_KEY).unwrap().as_deref(),
            Some("tok-2")
        );
    }

    #[test]
    fn test_token_stored_verbatim() {
        let mut session = Session::initialize(MemoryTokenStore::new()).unwrap();

        session.login("abc123".to_string()).unwrap();

        assert_eq!(
            session.store.get(TOKEN_KEY).unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_session_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::initialize(FileTokenStore::at(path.clone())).unwrap();
        session.login("tok-1".to_string()).unwrap();
        drop(session);

        let session = Session::initialize(FileTokenStore::at(path)).unwrap();
        assert_eq!(session.current_token(), Some("tok-1"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_logout_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::initialize(FileTokenStore::at(path.clone())).unwrap();
        session.login("tok-1".to_string()).unwrap();
        session.logout().unwrap();
        drop(session);

        let session = Session::initialize(FileTokenStore::at(path)).unwrap();
        assert_eq!(session.current_token(), None);
        assert!(!session.is_authenticated());
    }
}
