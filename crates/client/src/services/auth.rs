//! Authentication operations.

use std::sync::Arc;

use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::session::{Session, SessionManager};
use crate::types::UserProfile;

/// Login and logout against the backend, keeping the session in sync.
#[derive(Clone)]
pub struct AuthService {
    gateway: HttpGateway,
    session: Arc<SessionManager>,
}

impl AuthService {
    /// Wire the service to the gateway and session manager.
    #[must_use]
    pub fn new(gateway: HttpGateway, session: Arc<SessionManager>) -> Self {
        Self { gateway, session }
    }

    /// Exchange a Google id-token for a Sunbird session.
    ///
    /// On success the returned token pair and profile are stored as the
    /// current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails or the session cannot be
    /// persisted.
    #[instrument(skip_all)]
    pub async fn login_with_google(&self, id_token: &str) -> Result<UserProfile, ApiError> {
        let body = serde_json::json!({ "idToken": id_token });
        let session: Session = self.gateway.post("/auth/google", &body).await?;

        let user = session.user.clone();
        self.session.set(session)?;
        tracing::debug!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Sign out.
    ///
    /// The local session is cleared unconditionally; the backend call is
    /// best-effort notification so a dead network cannot trap the user in
    /// a signed-in state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejected the call or the local
    /// clear failed; the local session is gone either way.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.gateway.post_unit("/auth/logout").await;
        self.session.clear()?;
        result
    }
}
