//! Signed-in session: bearer token, user profile and role.
//!
//! The session is process-wide state with an explicit lifecycle. It is
//! restored from the credential store at startup, mutated only by
//! [`Session::sign_in`] and [`Session::logout`], and torn down by
//! [`Session::force_logout`] when the API answers 401/403. The rest of the
//! crate sees it only through the attach-token / is-authenticated capability.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::entity::de_string_or_number;
use crate::error::{BackofficeError, Result};
use crate::storage::{CredentialStore, KEY_ROLE, KEY_TOKEN, KEY_USER};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Profile returned by `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// Bearer token. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry from the JWT `exp` claim. `None` for opaque tokens or tokens
    /// without the claim.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.0.split('.').nth(1)?;
        let decoded = Zeroizing::new(URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?);
        let claims: Value = serde_json::from_slice(&decoded).ok()?;
        let exp = claims.get("exp").and_then(Value::as_i64)?;
        DateTime::from_timestamp(exp, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Authentication status broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    SignedOut,
    SignedIn,
    /// Torn down because the API rejected the token (401/403) or it expired.
    /// The UI should route back to the login screen.
    Revoked,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    session_id: Uuid,
    user: SessionUser,
    role: String,
    token: AccessToken,
    signed_in_at: DateTime<Utc>,
}

pub struct Session {
    store: Arc<dyn CredentialStore>,
    active: Mutex<Option<ActiveSession>>,
    status: watch::Sender<AuthStatus>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Session {
    /// Restore the persisted session, if any.
    ///
    /// A session is restored only when token, user and role are all present,
    /// the user record parses, and the token has not expired. Anything else
    /// leaves the store cleared and the session signed out.
    pub fn restore(store: Arc<dyn CredentialStore>) -> Self {
        let restored = load_persisted(store.as_ref());
        let status = if restored.is_some() {
            AuthStatus::SignedIn
        } else {
            AuthStatus::SignedOut
        };
        if let Some(active) = restored.as_ref() {
            info!(user_id = %active.user.id, role = %active.role, "session restored");
        }
        let (tx, _rx) = watch::channel(status);
        Self {
            store,
            active: Mutex::new(restored),
            status: tx,
        }
    }

    /// Record a successful login/registration and persist it.
    pub fn sign_in(&self, token: AccessToken, user: SessionUser) -> Result<()> {
        let user_json =
            serde_json::to_string(&user).map_err(|e| BackofficeError::Storage(e.to_string()))?;
        self.store.set(KEY_USER, &user_json)?;
        self.store.set(KEY_ROLE, &user.role)?;
        self.store.set(KEY_TOKEN, token.as_str())?;

        let session = ActiveSession {
            session_id: Uuid::new_v4(),
            role: user.role.clone(),
            user,
            token,
            signed_in_at: Utc::now(),
        };
        info!(
            session_id = %session.session_id,
            user_id = %session.user.id,
            role = %session.role,
            "signed in"
        );
        *self.lock() = Some(session);
        self.status.send_replace(AuthStatus::SignedIn);
        Ok(())
    }

    /// User-initiated logout.
    pub fn logout(&self) {
        if self.tear_down() {
            info!("signed out");
        }
        self.status.send_replace(AuthStatus::SignedOut);
    }

    /// Tear the session down after the API rejected the token.
    pub fn force_logout(&self, reason: &str) {
        if self.tear_down() {
            warn!(reason = %reason, "session revoked; clearing stored credentials");
            self.status.send_replace(AuthStatus::Revoked);
        }
    }

    fn tear_down(&self) -> bool {
        let previous = self.lock().take();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored credentials");
        }
        previous.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

impl Session {
    /// Token to attach to an outgoing request. An expired token revokes the
    /// session and yields `None`.
    pub fn bearer_token(&self) -> Option<AccessToken> {
        let token = self.lock().as_ref().map(|s| s.token.clone())?;
        if token.is_expired_at(Utc::now()) {
            self.force_logout("access token expired");
            return None;
        }
        Some(token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.lock().as_ref().map(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.role.clone())
    }

    pub fn signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.lock().as_ref().map(|s| s.signed_in_at)
    }

    pub fn status(&self) -> AuthStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }
}

fn load_persisted(store: &dyn CredentialStore) -> Option<ActiveSession> {
    let token = store.get(KEY_TOKEN).map(AccessToken::new);
    let user_json = store.get(KEY_USER);
    let role = store.get(KEY_ROLE);

    let (Some(token), Some(user_json), Some(role)) = (token, user_json, role) else {
        return None;
    };

    let user: SessionUser = match serde_json::from_str(&user_json) {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "stored user record is unreadable; discarding session");
            discard_persisted(store);
            return None;
        }
    };

    if token.is_expired_at(Utc::now()) {
        info!(user_id = %user.id, "stored access token expired; discarding session");
        discard_persisted(store);
        return None;
    }

    Some(ActiveSession {
        session_id: Uuid::new_v4(),
        user,
        role,
        token,
        signed_in_at: Utc::now(),
    })
}

fn discard_persisted(store: &dyn CredentialStore) {
    if let Err(e) = store.clear() {
        warn!(error = %e, "failed to clear stored credentials");
    }
}
