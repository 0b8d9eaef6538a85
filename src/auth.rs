//! Account flows: login, registration and OTP-based password reset.
//!
//! Every form is validated client-side before any request is made; a failing
//! form returns [`BackofficeError::Validation`] and never reaches the server.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::client::ApiClient;
use crate::error::Result;
use crate::session::{AccessToken, SessionUser};
use crate::validation::{not_blank, otp_code};

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct RegisterForm {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must not exceed 100 characters")
    )]
    pub name: String,
    #[validate(
        email(message = "Email should be valid"),
        length(max = 150, message = "Email must not exceed 150 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(skip)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
struct EmailForm {
    #[validate(email(message = "Email should be valid"))]
    email: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct VerifyOtpForm {
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(custom(function = "otp_code"))]
    pub otp: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[validate(custom(function = "not_blank", message = "Reset token is required"))]
    pub reset_token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    message: String,
    access_token: String,
    user: SessionUser,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

/// Result of a successful OTP check: the one-time token that authorises
/// the password reset.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerified {
    #[serde(default)]
    pub message: String,
    pub reset_token: String,
}

impl std::fmt::Debug for OtpVerified {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpVerified")
            .field("message", &self.message)
            .field("reset_token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<SessionUser> {
        form.validate()?;
        let resp: AuthResponse = self
            .client
            .post("/auth/login", form)
            .await
            .inspect_err(|e| warn!(error = %e, "login failed"))?;
        self.establish(resp)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<SessionUser> {
        form.validate()?;
        let resp: AuthResponse = self
            .client
            .post("/auth/register", form)
            .await
            .inspect_err(|e| warn!(error = %e, "registration failed"))?;
        self.establish(resp)
    }

    /// Ask the server to email a reset OTP.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        self.email_only("/auth/forgot-password", email).await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<String> {
        self.email_only("/auth/resend-otp", email).await
    }

    pub async fn verify_otp(&self, form: &VerifyOtpForm) -> Result<OtpVerified> {
        form.validate()?;
        let verified: OtpVerified = self.client.post("/auth/verify-otp", form).await?;
        info!(email = %mask_email(&form.email), "OTP verified");
        Ok(verified)
    }

    pub async fn reset_password(&self, form: &ResetPasswordForm) -> Result<String> {
        form.validate()?;
        let resp: Option<MessageResponse> = self.client.post("/auth/reset-password", form).await?;
        info!("password reset");
        Ok(resp
            .map(|r| r.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Password has been reset successfully.".to_string()))
    }

    pub fn logout(&self) {
        self.client.session().logout();
    }

    async fn email_only(&self, path: &str, email: &str) -> Result<String> {
        let form = EmailForm {
            email: email.trim().to_string(),
        };
        form.validate()?;
        let resp: Option<MessageResponse> = self.client.post(path, &form).await?;
        info!(path, email = %mask_email(&form.email), "OTP requested");
        Ok(resp.map(|r| r.message).unwrap_or_default())
    }

    fn establish(&self, resp: AuthResponse) -> Result<SessionUser> {
        let user = resp.user.clone();
        self.client
            .session()
            .sign_in(AccessToken::new(resp.access_token), resp.user)?;
        if !resp.message.is_empty() {
            info!(user_id = %user.id, message = %resp.message, "auth response");
        }
        Ok(user)
    }
}

/// Mask the local part of an email for display: `ab******@domain`.
/// Local parts of two characters or fewer are shown as-is.
pub fn mask_email(email: &str) -> String {
    let (name, domain) = match email.rsplit_once('@') {
        Some((name, domain)) => (name, Some(domain)),
        None => (email, None),
    };
    let masked = if name.chars().count() > 2 {
        let prefix: String = name.chars().take(2).collect();
        format!("{prefix}******")
    } else {
        name.to_string()
    };
    match domain {
        Some(domain) => format!("{masked}@{domain}"),
        None => masked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackofficeConfig;
    use crate::error::BackofficeError;
    use crate::session::tests::{jwt_with_exp, sample_user};
    use crate::session::{AuthStatus, Session};
    use crate::storage::{CredentialStore, MemoryStore, KEY_ROLE};
    use crate::validation::field_messages;
    use std::sync::Arc;
    use std::time::Duration;

    fn offline_service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(Session::restore(store.clone()));
        let config = BackofficeConfig {
            request_timeout: Duration::from_secs(2),
            ..BackofficeConfig::default()
        }
        .with_base_url("http://127.0.0.1:9");
        let client = ApiClient::new(&config, session).unwrap();
        (AuthService::new(client), store)
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("abcdef@shop.test"), "ab******@shop.test");
        assert_eq!(mask_email("ab@shop.test"), "ab@shop.test");
        assert_eq!(mask_email("đặng@shop.test"), "đặ******@shop.test");
        assert_eq!(mask_email("noatsign"), "no******");
    }

    #[test]
    fn test_register_form_rules() {
        let form = RegisterForm {
            name: "Ann".into(),
            email: "ann@shop.test".into(),
            password: "12345".into(),
            confirm_password: "54321".into(),
        };
        let fields: Vec<String> = field_messages(&form.validate().unwrap_err())
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(fields, vec!["confirm_password", "password"]);

        let body = serde_json::to_value(RegisterForm {
            confirm_password: "secret".into(),
            password: "secret".into(),
            ..form
        })
        .unwrap();
        assert!(body.get("confirm_password").is_none());
        assert_eq!(body["password"], "secret");
    }

    #[test]
    fn test_reset_form_rules() {
        let form = ResetPasswordForm {
            reset_token: " ".into(),
            new_password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("reset_token"));

        let body = serde_json::to_value(ResetPasswordForm {
            reset_token: "tok".into(),
            ..form
        })
        .unwrap();
        assert_eq!(body["resetToken"], "tok");
        assert_eq!(body["newPassword"], "secret1");
        assert_eq!(body["confirmPassword"], "secret1");
    }

    #[tokio::test]
    async fn test_invalid_forms_never_hit_the_network() {
        let (auth, _) = offline_service();

        let err = auth
            .login(&LoginForm {
                email: "not-an-email".into(),
                password: "".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = auth
            .verify_otp(&VerifyOtpForm {
                email: "ann@shop.test".into(),
                otp: "12a456".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = auth.forgot_password("nobody").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_valid_login_against_unreachable_server() {
        let (auth, store) = offline_service();
        let err = auth
            .login(&LoginForm {
                email: "ann@shop.test".into(),
                password: "secret".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Network(_)));
        assert!(!auth.client.session().is_authenticated());
        assert!(!store.has(KEY_ROLE));
    }

    #[test]
    fn test_auth_response_signs_in_and_logout_clears() {
        let (auth, store) = offline_service();
        let token = jwt_with_exp(chrono::Utc::now().timestamp() + 3600);
        let resp: AuthResponse = serde_json::from_value(serde_json::json!({
            "message": "Login successful",
            "accessToken": token,
            "user": { "id": 1, "name": "Admin", "email": "admin@pos.test", "role": "ADMIN" }
        }))
        .unwrap();

        let user = auth.establish(resp).unwrap();
        assert_eq!(user.id, sample_user().id);
        let session = auth.client.session();
        assert_eq!(session.status(), AuthStatus::SignedIn);
        assert_eq!(session.role().as_deref(), Some("ADMIN"));
        assert_eq!(store.get(KEY_ROLE).as_deref(), Some("ADMIN"));

        auth.logout();
        assert_eq!(session.status(), AuthStatus::SignedOut);
        assert!(!store.has(KEY_ROLE));
    }
}
