//! The single request pipeline.
//!
//! Every outgoing call goes through [`HttpGateway`]: it attaches the
//! bearer credential when a session is present, unwraps the
//! `{success, message, data}` envelope, and on a 401 performs one
//! transparent refresh-and-retry cycle.
//!
//! Concurrent authorization failures share a single in-flight refresh: the
//! first task through the latch rotates the token pair, later tasks see
//! the already-rotated token and go straight to their retry.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{Session, SessionManager};
use crate::types::ApiResponse;

/// Request payload variants the gateway knows how to rebuild for a retry.
enum Payload {
    None,
    Json(Value),
    Multipart { filename: String, bytes: Vec<u8> },
}

/// Token pair returned by `POST /auth/refresh`.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPair {
    access_token: String,
    refresh_token: String,
}

/// HTTP request pipeline for the Sunbird backend.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionManager>,
    /// Single-flight latch for the refresh sequence.
    refresh_latch: tokio::sync::Mutex<()>,
}

impl HttpGateway {
    /// Create a gateway for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                http,
                base_url: config.base_url.clone(),
                session,
                refresh_latch: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// The session manager this gateway authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.inner.session
    }

    // =========================================================================
    // Verb helpers
    // =========================================================================

    /// `GET` a typed payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, &[], Payload::None).await
    }

    /// `GET` a typed payload with query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, query, Payload::None).await
    }

    /// `POST` a JSON body, returning a typed payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, &[], Payload::Json(body))
            .await
    }

    /// `POST` with no body, ignoring the response payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        self.request::<IgnoredData>(Method::POST, path, &[], Payload::None)
            .await?;
        Ok(())
    }

    /// `POST` a JSON body, ignoring the response payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn post_unit_with<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_value(body)?;
        self.request::<IgnoredData>(Method::POST, path, &[], Payload::Json(body))
            .await?;
        Ok(())
    }

    /// `PUT` a JSON body, returning a typed payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, &[], Payload::Json(body))
            .await
    }

    /// `PUT` a JSON body, ignoring the response payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn put_unit_with<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_value(body)?;
        self.request::<IgnoredData>(Method::PUT, path, &[], Payload::Json(body))
            .await?;
        Ok(())
    }

    /// `DELETE`, ignoring the response payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        self.request::<IgnoredData>(Method::DELETE, path, &[], Payload::None)
            .await?;
        Ok(())
    }

    /// `POST` a single file as `multipart/form-data`, returning a typed
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns an error per the crate-level taxonomy.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ApiError> {
        self.request(
            Method::POST,
            path,
            &[],
            Payload::Multipart {
                filename: filename.to_owned(),
                bytes,
            },
        )
        .await
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    #[instrument(skip(self, query, payload), fields(method = %method, path = %path))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Payload,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let token = self.inner.session.access_token();

        let response = self
            .attempt(&method, &url, query, &payload, token.as_deref())
            .await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            debug!("request rejected as unauthorized, entering refresh sequence");
            let fresh = self.refresh_after_unauthorized(token.as_deref()).await?;
            // Resend the original request exactly once with the new
            // credential; a second 401 is surfaced as-is.
            self.attempt(&method, &url, query, &payload, Some(&fresh))
                .await?
        } else {
            response
        };

        let data = self.read_envelope(response).await?;
        Ok(serde_json::from_value(data)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Validation(format!("invalid request path {path}: {err}")))
    }

    /// Issue one HTTP attempt. Transport failures map to `Network`.
    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&str, String)],
        payload: &Payload,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self.inner.http.request(method.clone(), url.clone());

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match payload {
            Payload::None => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Multipart { filename, bytes } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.clone());
                builder.multipart(reqwest::multipart::Form::new().part("file", part))
            }
        };

        Ok(builder.send().await?)
    }

    /// The refresh sequence: exchange the stored refresh token for a new
    /// pair, update the session, and hand back the new access token.
    ///
    /// `stale` is the access token the failed attempt carried. After
    /// acquiring the latch the current token is compared against it: a
    /// difference means another task already refreshed while we waited,
    /// and the redundant refresh call is skipped.
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.inner.refresh_latch.lock().await;

        if let Some(current) = self.inner.session.access_token()
            && Some(current.as_str()) != stale
        {
            debug!("token already rotated by a concurrent refresh");
            return Ok(current);
        }

        let Some(refresh_token) = self.inner.session.refresh_token() else {
            if stale.is_some() {
                // The request carried a token but the session is gone: a
                // concurrent refresh failed and cleared it while we
                // waited on the latch. Report the same outcome.
                return Err(ApiError::SessionExpired);
            }
            // Anonymous request: nothing to refresh, nothing to clear.
            return Err(ApiError::Unauthorized("authentication required".to_owned()));
        };

        match self.call_refresh_endpoint(&refresh_token).await {
            Ok(pair) => {
                let Some(user) = self.inner.session.user() else {
                    // Session vanished mid-flight (e.g., explicit logout).
                    return Err(ApiError::SessionExpired);
                };
                let access_token = pair.access_token.clone();
                self.inner.session.set(Session {
                    access_token: pair.access_token,
                    refresh_token: pair.refresh_token,
                    user,
                })?;
                debug!("token pair rotated");
                Ok(access_token)
            }
            Err(err) => {
                warn!(error = %err, "refresh failed, clearing session");
                self.inner.session.clear()?;
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Call `POST /auth/refresh` directly - no bearer header, no retry.
    async fn call_refresh_endpoint(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let url = self.endpoint("/auth/refresh")?;
        let body = serde_json::json!({ "refreshToken": refresh_token });

        let response = self.inner.http.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Server { status, message });
        }

        let envelope: ApiResponse<TokenPair> = response.json().await?;
        envelope.data.ok_or(ApiError::Server {
            status: 200,
            message: "refresh response carried no token pair".to_owned(),
        })
    }

    /// Unwrap the response envelope into its `data` payload.
    async fn read_envelope(&self, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<Value>>(&text)
                .ok()
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| ApiError::GENERIC_SERVER_MESSAGE.to_owned());

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::Unauthorized(message)
                }
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                _ => ApiError::Server {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let envelope: ApiResponse<Value> = serde_json::from_str(&text)?;
        if !envelope.success {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: if envelope.message.is_empty() {
                    ApiError::GENERIC_SERVER_MESSAGE.to_owned()
                } else {
                    envelope.message
                },
            });
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Deserialization target for unit endpoints whose `data` is null or
/// missing entirely.
type IgnoredData = Option<Value>;
