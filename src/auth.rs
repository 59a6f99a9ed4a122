//! Simulated signup, login, OTP verification and logout

use crate::error::{AuthError, AuthFailure, ValidationError};
use crate::navigation::Page;
use crate::notify::{Notification, Notifier};
use crate::storage::SessionStore;
use crate::types::{PendingOtp, RegisteredUser, Session};
use crate::validation::{validate_email, validate_password};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
const FAILURE_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

/// Delayed navigation requested by an auth step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub after: Duration,
}

impl Redirect {
    pub fn to(target: impl Into<String>, after: Duration) -> Self {
        Self {
            target: target.into(),
            after,
        }
    }
}

/// Confirmation shown after a successful step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub message: String,
    pub redirect: Option<Redirect>,
}

/// Second login step. In the demo the code is shown to the user directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub email: String,
    pub code: String,
}

/// Result of a verified OTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub session: Session,
    pub outcome: AuthOutcome,
}

pub struct AuthWorkflow {
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
    message_ttl: Duration,
}

impl AuthWorkflow {
    pub fn new(store: SessionStore, notifier: Arc<dyn Notifier>, message_ttl: Duration) -> Self {
        Self {
            store,
            notifier,
            message_ttl,
        }
    }

    pub fn current_session(&self) -> Result<Option<Session>, AuthFailure> {
        Ok(self.store.session()?)
    }

    pub fn is_authenticated(&self) -> Result<bool, AuthFailure> {
        Ok(self.store.is_authenticated()?)
    }

    /// Register a new account
    pub fn signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, AuthFailure> {
        let result = self.try_signup(email.trim(), password, confirm_password);
        self.announce(result)
    }

    fn try_signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, AuthFailure> {
        if email.is_empty() || !validate_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingNewPassword.into());
        }
        if !validate_password(password) {
            return Err(ValidationError::WeakPassword.into());
        }
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        if self.store.find_user(email)?.is_some() {
            return Err(AuthError::AlreadyRegistered {
                redirect: Redirect::to(Page::Login.href(), FAILURE_REDIRECT_DELAY),
            }
            .into());
        }

        self.store.add_user(RegisteredUser::new(email, password))?;
        info!(email = %email, "Account registered");

        Ok(AuthOutcome {
            message: "Account created successfully! Redirecting to login...".to_string(),
            redirect: Some(Redirect::to(Page::Login.href(), SUCCESS_REDIRECT_DELAY)),
        })
    }

    /// Check credentials and issue a one-time passcode
    pub fn login(&self, email: &str, password: &str) -> Result<OtpChallenge, AuthFailure> {
        let result = self.try_login(email.trim(), password);
        if let Err(e) = &result {
            self.notifier
                .notify(Notification::error(e.to_string(), self.message_ttl));
        }
        result
    }

    fn try_login(&self, email: &str, password: &str) -> Result<OtpChallenge, AuthFailure> {
        if email.is_empty() || !validate_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingPassword.into());
        }

        let user = self.store.find_user(email)?.ok_or_else(|| AuthError::AccountNotFound {
            redirect: Redirect::to(Page::Signup.href(), FAILURE_REDIRECT_DELAY),
        })?;

        if user.password != password {
            return Err(AuthError::IncorrectPassword.into());
        }

        let pending = PendingOtp {
            code: generate_otp(),
            email: email.to_string(),
        };
        self.store.store_pending_otp(&pending)?;
        info!(email = %email, "Password accepted, OTP issued");

        Ok(OtpChallenge {
            email: pending.email,
            code: pending.code,
        })
    }

    /// Complete login with the passcode from [`AuthWorkflow::login`]
    pub fn verify_otp(&self, entered: &str) -> Result<SignIn, AuthFailure> {
        let result = self.try_verify_otp(entered.trim());
        match &result {
            Ok(sign_in) => self.notifier.notify(Notification::success(
                sign_in.outcome.message.clone(),
                self.message_ttl,
            )),
            Err(e) => self
                .notifier
                .notify(Notification::error(e.to_string(), self.message_ttl)),
        }
        result
    }

    fn try_verify_otp(&self, entered: &str) -> Result<SignIn, AuthFailure> {
        if entered.is_empty() {
            return Err(ValidationError::MissingOtp.into());
        }

        let pending = match self.store.pending_otp()? {
            Some(pending) if pending.code == entered => pending,
            _ => {
                debug!("OTP rejected");
                return Err(AuthError::InvalidOtp.into());
            }
        };

        let session = Session {
            auth_token: uuid::Uuid::new_v4().to_string(),
            user_name: Session::user_name_for(&pending.email),
            user_email: pending.email,
        };
        self.store.store_session(&session)?;
        self.store.clear_pending_otp()?;

        let target = self
            .store
            .take_redirect_after_login()?
            .unwrap_or_else(|| Page::Home.href().to_string());
        info!(email = %session.user_email, redirect = %target, "Login complete");

        Ok(SignIn {
            session,
            outcome: AuthOutcome {
                message: "Login successful! Redirecting...".to_string(),
                redirect: Some(Redirect::to(target, SUCCESS_REDIRECT_DELAY)),
            },
        })
    }

    /// Drop the session and send the user home
    pub fn logout(&self) -> Result<AuthOutcome, AuthFailure> {
        let result = self.try_logout();
        self.announce(result)
    }

    fn try_logout(&self) -> Result<AuthOutcome, AuthFailure> {
        self.store.clear_session()?;
        info!("Logged out");

        Ok(AuthOutcome {
            message: "You have been logged out successfully".to_string(),
            redirect: Some(Redirect::to(Page::Home.href(), SUCCESS_REDIRECT_DELAY)),
        })
    }

    /// Remember where to land after the next successful login
    pub fn remember_redirect(&self, target: &str) -> Result<(), AuthFailure> {
        Ok(self.store.set_redirect_after_login(target)?)
    }

    fn announce(&self, result: Result<AuthOutcome, AuthFailure>) -> Result<AuthOutcome, AuthFailure> {
        let notification = match &result {
            Ok(outcome) => Notification::success(outcome.message.clone(), self.message_ttl),
            Err(e) => Notification::error(e.to_string(), self.message_ttl),
        };
        self.notifier.notify(notification);
        result
    }
}

/// Random 6-digit numeric code without a leading zero
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationCenter, NotificationLevel, WORKFLOW_TTL};

    fn workflow() -> (AuthWorkflow, SessionStore, Arc<NotificationCenter>) {
        let store = SessionStore::in_memory();
        let center = Arc::new(NotificationCenter::new());
        let auth = AuthWorkflow::new(store.clone(), center.clone(), WORKFLOW_TTL);
        (auth, store, center)
    }

    #[test]
    fn test_signup_rejects_duplicate_email() {
        let (auth, store, _) = workflow();

        auth.signup("ana@example.com", "Secret123", "Secret123").unwrap();
        auth.signup("ben@example.com", "Secret123", "Secret123").unwrap();

        let err = auth.signup("ana@example.com", "Other4567", "Other4567").unwrap_err();
        match err {
            AuthFailure::Auth(e @ AuthError::AlreadyRegistered { .. }) => {
                assert_eq!(e.redirect().unwrap().target, "login.html");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.registered_users().unwrap().len(), 2);
    }

    #[test]
    fn test_signup_validation_order() {
        let (auth, _, center) = workflow();

        let cases = [
            ("not-an-email", "Secret123", "Secret123", ValidationError::InvalidEmail),
            ("ana@example.com", "", "", ValidationError::MissingNewPassword),
            ("ana@example.com", "secret", "secret", ValidationError::WeakPassword),
            ("ana@example.com", "Secret123", "Secret124", ValidationError::PasswordMismatch),
        ];
        for (email, password, confirm, expected) in cases {
            match auth.signup(email, password, confirm) {
                Err(AuthFailure::Validation(e)) => assert_eq!(e, expected),
                other => panic!("unexpected result: {other:?}"),
            }
        }

        let last = center.latest().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.message, "Passwords do not match");
    }

    #[test]
    fn test_login_failures() {
        let (auth, store, _) = workflow();
        auth.signup("ana@example.com", "Secret123", "Secret123").unwrap();

        match auth.login("ghost@example.com", "Secret123") {
            Err(AuthFailure::Auth(e @ AuthError::AccountNotFound { .. })) => {
                assert_eq!(e.redirect().unwrap().target, "signup.html");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            auth.login("ana@example.com", "Wrong1234"),
            Err(AuthFailure::Auth(AuthError::IncorrectPassword))
        ));
        assert!(matches!(
            auth.login("ana@example.com", ""),
            Err(AuthFailure::Validation(ValidationError::MissingPassword))
        ));
        assert_eq!(store.pending_otp().unwrap(), None);
    }

    #[test]
    fn test_otp_flow() {
        let (auth, store, _) = workflow();
        auth.signup("ana@example.com", "Secret123", "Secret123").unwrap();

        let challenge = auth.login(" ana@example.com ", "Secret123").unwrap();
        assert_eq!(challenge.code.len(), 6);
        assert!(challenge.code.chars().all(|c| c.is_ascii_digit()));

        let wrong = if challenge.code == "123456" { "654321" } else { "123456" };
        assert!(matches!(
            auth.verify_otp(wrong),
            Err(AuthFailure::Auth(AuthError::InvalidOtp))
        ));
        assert_eq!(store.pending_otp().unwrap().unwrap().code, challenge.code);
        assert!(!auth.is_authenticated().unwrap());

        let sign_in = auth.verify_otp(&challenge.code).unwrap();
        assert_eq!(sign_in.session.user_email, "ana@example.com");
        assert_eq!(sign_in.session.user_name, "ana");
        assert_eq!(sign_in.outcome.redirect.unwrap().target, "index.html");
        assert_eq!(store.pending_otp().unwrap(), None);
        assert_eq!(auth.current_session().unwrap(), Some(sign_in.session));
    }

    #[test]
    fn test_verify_without_pending_code_fails() {
        let (auth, _, _) = workflow();
        assert!(matches!(
            auth.verify_otp("123456"),
            Err(AuthFailure::Auth(AuthError::InvalidOtp))
        ));
        assert!(matches!(
            auth.verify_otp("  "),
            Err(AuthFailure::Validation(ValidationError::MissingOtp))
        ));
    }

    #[test]
    fn test_redirect_after_login_and_logout() {
        let (auth, _, center) = workflow();
        auth.signup("ana@example.com", "Secret123", "Secret123").unwrap();
        auth.remember_redirect("upload.html").unwrap();

        let challenge = auth.login("ana@example.com", "Secret123").unwrap();
        let sign_in = auth.verify_otp(&challenge.code).unwrap();
        assert_eq!(sign_in.outcome.redirect.unwrap().target, "upload.html");

        let outcome = auth.logout().unwrap();
        assert_eq!(outcome.redirect.unwrap().target, "index.html");
        assert!(!auth.is_authenticated().unwrap());
        assert_eq!(center.latest().unwrap().level, NotificationLevel::Success);
    }

    #[test]
    fn test_generated_otp_is_six_digits() {
        for _ in 0..100 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            assert!(!code.starts_with('0'));
        }
    }
}
