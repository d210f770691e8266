//! Authentication session ownership.
//!
//! A [`Session`] is the access/refresh token pair plus the signed-in
//! profile. The invariant is all-or-nothing: either every field is present
//! and consistent, or there is no session at all - no partial session is
//! ever handed to the rest of the client.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError, keys};
use crate::types::UserProfile;

/// An authenticated identity paired with its token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Long-lived credential exchanged for new access tokens.
    pub refresh_token: String,
    /// The signed-in user.
    pub user: UserProfile,
}

/// Owns the current session and keeps it persisted.
///
/// Shared behind an `Arc`; interior state sits behind an `RwLock` so the
/// gateway's refresh path is the only writer while requests read tokens
/// concurrently.
pub struct SessionManager {
    storage: Arc<dyn Storage>,
    state: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Restore the session persisted in `storage`, if it is complete.
    ///
    /// A session is restored only when all three keys (access token,
    /// refresh token, user profile) are present and the profile parses.
    /// Anything less is treated as no session, and the partial leftovers
    /// are scrubbed so they cannot resurface later.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn load(storage: Arc<dyn Storage>) -> Result<Self, StorageError> {
        let access_token = storage.get(keys::ACCESS_TOKEN)?;
        let refresh_token = storage.get(keys::REFRESH_TOKEN)?;
        let user_json = storage.get(keys::USER)?;

        let session = match (access_token, refresh_token, user_json) {
            (Some(access_token), Some(refresh_token), Some(user_json)) => {
                match serde_json::from_str::<UserProfile>(&user_json) {
                    Ok(user) => Some(Session {
                        access_token,
                        refresh_token,
                        user,
                    }),
                    Err(err) => {
                        tracing::warn!(error = %err, "persisted user profile does not parse");
                        None
                    }
                }
            }
            (None, None, None) => None,
            _ => {
                tracing::warn!("persisted session is incomplete, discarding");
                None
            }
        };

        if session.is_none() {
            // Scrub partial leftovers; harmless when nothing was stored.
            storage.remove(keys::ACCESS_TOKEN)?;
            storage.remove(keys::REFRESH_TOKEN)?;
            storage.remove(keys::USER)?;
        }

        Ok(Self {
            storage,
            state: RwLock::new(session),
        })
    }

    /// Replace the current session, in memory and in storage.
    ///
    /// The three persisted keys are written while holding the write lock,
    /// making this one logical write from the client's point of view.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting any field fails.
    pub fn set(&self, session: Session) -> Result<(), StorageError> {
        let mut state = self.write();
        self.storage.set(keys::ACCESS_TOKEN, &session.access_token)?;
        self.storage.set(keys::REFRESH_TOKEN, &session.refresh_token)?;
        let user_json = serde_json::to_string(&session.user)?;
        self.storage.set(keys::USER, &user_json)?;
        *state = Some(session);
        Ok(())
    }

    /// Drop the session from memory and delete all persisted fields.
    ///
    /// # Errors
    ///
    /// Returns an error if removing a persisted field fails; the
    /// in-memory session is dropped regardless.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.write();
        *state = None;
        self.storage.remove(keys::ACCESS_TOKEN)?;
        self.storage.remove(keys::REFRESH_TOKEN)?;
        self.storage.remove(keys::USER)?;
        Ok(())
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Whether a session is present and the user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.read()
            .as_ref()
            .is_some_and(|s| s.user.role == sunbird_core::UserRole::Admin)
    }

    /// The current access token, if authenticated.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.access_token.clone())
    }

    /// The current refresh token, if authenticated.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.refresh_token.clone())
    }

    /// The signed-in user profile, if authenticated.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    /// Update only the persisted user profile, keeping the token pair.
    ///
    /// Used after a profile edit so the stored `user` key stays consistent
    /// with what the backend holds. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the profile fails.
    pub fn update_user(&self, user: UserProfile) -> Result<(), StorageError> {
        let mut state = self.write();
        if let Some(session) = state.as_mut() {
            let user_json = serde_json::to_string(&user)?;
            self.storage.set(keys::USER, &user_json)?;
            session.user = user;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use sunbird_core::{Email, UserId, UserRole};

    use super::*;
    use crate::storage::MemoryStorage;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            email: Email::parse("shopper@example.com").unwrap(),
            name: "Shopper".to_owned(),
            first_name: None,
            last_name: None,
            username: None,
            phone: None,
            address: None,
            role,
            profile_completed: Some(true),
        }
    }

    fn session(role: UserRole) -> Session {
        Session {
            access_token: "access-1".to_owned(),
            refresh_token: "refresh-1".to_owned(),
            user: profile(role),
        }
    }

    #[test]
    fn starts_unauthenticated_on_empty_storage() {
        let manager = SessionManager::load(Arc::new(MemoryStorage::new())).unwrap();
        assert!(!manager.is_authenticated());
        assert!(!manager.is_admin());
        assert!(manager.access_token().is_none());
    }

    #[test]
    fn set_persists_all_three_fields() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = SessionManager::load(storage.clone()).unwrap();

        manager.set(session(UserRole::Customer)).unwrap();

        assert!(manager.is_authenticated());
        assert!(!manager.is_admin());
        assert_eq!(
            storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("access-1")
        );
        assert_eq!(
            storage.get(keys::REFRESH_TOKEN).unwrap().as_deref(),
            Some("refresh-1")
        );
        assert!(storage.get(keys::USER).unwrap().is_some());
    }

    #[test]
    fn reload_restores_a_complete_session() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let manager = SessionManager::load(storage.clone()).unwrap();
            manager.set(session(UserRole::Admin)).unwrap();
        }

        let reloaded = SessionManager::load(storage).unwrap();
        assert!(reloaded.is_authenticated());
        assert!(reloaded.is_admin());
        assert_eq!(reloaded.access_token().as_deref(), Some("access-1"));
    }

    #[test]
    fn partial_session_is_discarded_and_scrubbed() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::ACCESS_TOKEN, "stale").unwrap();
        storage.set(keys::REFRESH_TOKEN, "stale").unwrap();
        // no user key

        let manager = SessionManager::load(storage.clone()).unwrap();
        assert!(!manager.is_authenticated());
        assert!(storage.get(keys::ACCESS_TOKEN).unwrap().is_none());
        assert!(storage.get(keys::REFRESH_TOKEN).unwrap().is_none());
    }

    #[test]
    fn corrupt_user_profile_is_discarded_and_scrubbed() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::ACCESS_TOKEN, "tok").unwrap();
        storage.set(keys::REFRESH_TOKEN, "tok").unwrap();
        storage.set(keys::USER, "{definitely not json").unwrap();

        let manager = SessionManager::load(storage.clone()).unwrap();
        assert!(!manager.is_authenticated());
        assert!(storage.get(keys::USER).unwrap().is_none());
    }

    #[test]
    fn clear_removes_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = SessionManager::load(storage.clone()).unwrap();
        manager.set(session(UserRole::Customer)).unwrap();

        manager.clear().unwrap();

        assert!(!manager.is_authenticated());
        assert!(storage.get(keys::ACCESS_TOKEN).unwrap().is_none());
        assert!(storage.get(keys::REFRESH_TOKEN).unwrap().is_none());
        assert!(storage.get(keys::USER).unwrap().is_none());
    }

    #[test]
    fn update_user_keeps_tokens() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = SessionManager::load(storage).unwrap();
        manager.set(session(UserRole::Customer)).unwrap();

        let mut updated = profile(UserRole::Customer);
        updated.name = "Renamed".to_owned();
        manager.update_user(updated).unwrap();

        assert_eq!(manager.user().unwrap().name, "Renamed");
        assert_eq!(manager.access_token().as_deref(), Some("access-1"));
    }
}
