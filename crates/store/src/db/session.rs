//! Session slot operations.

use super::{LocalStore, Medium, RepositoryError, keys};
use crate::models::Session;

impl<M: Medium> LocalStore<M> {
    /// The current session, if anyone is logged in.
    ///
    /// A corrupt session value is logged and treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the medium cannot be read.
    pub fn get_session(&self) -> Result<Option<Session>, RepositoryError> {
        match self.decode::<Session>(keys::SESSION) {
            Ok(session) => Ok(session),
            Err(RepositoryError::Corrupt { key, reason }) => {
                tracing::warn!(key, %reason, "stored session is corrupt, treating as logged out");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the session slot. Any previous session is discarded.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the slot cannot be written.
    pub fn set_session(&mut self, session: &Session) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(session).map_err(|source| RepositoryError::Serialize {
            key: keys::SESSION,
            source,
        })?;
        self.medium.set(keys::SESSION, &raw)?;
        tracing::debug!(actor_id = %session.id, kind = %session.kind, "session set");
        Ok(())
    }

    /// Empty the session slot. Clearing an empty slot is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the slot cannot be written.
    pub fn clear_session(&mut self) -> Result<(), RepositoryError> {
        self.medium.remove(keys::SESSION)?;
        tracing::debug!("session cleared");
        Ok(())
    }
}
