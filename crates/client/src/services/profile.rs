//! Profile operations for the signed-in user.

use std::sync::Arc;

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::session::SessionManager;
use crate::types::{ProfileUpdate, UserProfile};

/// Read and update the signed-in user's profile.
///
/// Updates also refresh the persisted `user` key so the stored session
/// never drifts from what the backend holds.
#[derive(Clone)]
pub struct ProfileService {
    gateway: HttpGateway,
    session: Arc<SessionManager>,
}

impl ProfileService {
    /// Wire the service to the gateway and session manager.
    #[must_use]
    pub fn new(gateway: HttpGateway, session: Arc<SessionManager>) -> Self {
        Self { gateway, session }
    }

    /// Fetch the current profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self) -> Result<UserProfile, ApiError> {
        self.gateway.get("/profile").await
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or if persisting the updated
    /// profile locally fails.
    pub async fn update(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let profile: UserProfile = self.gateway.put("/profile", update).await?;
        self.session.update_user(profile.clone())?;
        Ok(profile)
    }
}
