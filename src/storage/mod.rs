//! Key-value stores backing the simulated session.
//!
//! Two stores mirror the browser's split: a persistent one that survives
//! restarts (auth token, user identity, registered accounts) and a transient
//! one that lives only as long as the process (pending OTP, post-login redirect).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;
use crate::types::{PendingOtp, RegisteredUser, Session};
use std::sync::Arc;
use tracing::warn;

/// Keys of the persistent store
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_EMAIL: &str = "user_email";
    pub const USER_NAME: &str = "user_name";
    pub const REGISTERED_USERS: &str = "registered_users";

    // transient
    pub const CURRENT_OTP: &str = "current_otp";
    pub const PENDING_LOGIN_EMAIL: &str = "pending_login_email";
    pub const REDIRECT_AFTER_LOGIN: &str = "redirect_after_login";
}

/// String-keyed store with browser storage semantics
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Typed access to the persistent/transient pair
#[derive(Clone)]
pub struct SessionStore {
    persistent: Arc<dyn KeyValueStore>,
    transient: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(persistent: Arc<dyn KeyValueStore>, transient: Arc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            transient,
        }
    }

    /// Both stores in memory; nothing outlives the value
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn persistent(&self) -> &dyn KeyValueStore {
        self.persistent.as_ref()
    }

    pub fn transient(&self) -> &dyn KeyValueStore {
        self.transient.as_ref()
    }

    /// Current session, present only when a token and email are both stored
    pub fn session(&self) -> Result<Option<Session>, StorageError> {
        let token = self.persistent.get(keys::AUTH_TOKEN)?;
        let email = self.persistent.get(keys::USER_EMAIL)?;

        Ok(match (token, email) {
            (Some(auth_token), Some(user_email)) => {
                let user_name = match self.persistent.get(keys::USER_NAME)? {
                    Some(name) => name,
                    None => Session::user_name_for(&user_email),
                };
                Some(Session {
                    auth_token,
                    user_email,
                    user_name,
                })
            }
            _ => None,
        })
    }

    /// Same rule as [`SessionStore::session`]: a token alone is not a session
    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.session()?.is_some())
    }

    pub fn store_session(&self, session: &Session) -> Result<(), StorageError> {
        self.persistent.set(keys::AUTH_TOKEN, &session.auth_token)?;
        self.persistent.set(keys::USER_EMAIL, &session.user_email)?;
        self.persistent.set(keys::USER_NAME, &session.user_name)
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.persistent.remove(keys::AUTH_TOKEN)?;
        self.persistent.remove(keys::USER_EMAIL)?;
        self.persistent.remove(keys::USER_NAME)
    }

    /// Registered accounts. A missing or unreadable list reads as empty.
    pub fn registered_users(&self) -> Result<Vec<RegisteredUser>, StorageError> {
        let Some(raw) = self.persistent.get(keys::REGISTERED_USERS)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                warn!(key = keys::REGISTERED_USERS, error = %e, "Ignoring corrupt user list");
                Ok(Vec::new())
            }
        }
    }

    pub fn find_user(&self, email: &str) -> Result<Option<RegisteredUser>, StorageError> {
        Ok(self
            .registered_users()?
            .into_iter()
            .find(|user| user.email == email))
    }

    pub fn add_user(&self, user: RegisteredUser) -> Result<(), StorageError> {
        let mut users = self.registered_users()?;
        users.push(user);

        let raw = serde_json::to_string(&users).map_err(|e| StorageError::Corrupt {
            key: keys::REGISTERED_USERS.to_string(),
            reason: e.to_string(),
        })?;
        self.persistent.set(keys::REGISTERED_USERS, &raw)
    }

    pub fn pending_otp(&self) -> Result<Option<PendingOtp>, StorageError> {
        let code = self.transient.get(keys::CURRENT_OTP)?;
        let email = self.transient.get(keys::PENDING_LOGIN_EMAIL)?;

        Ok(match (code, email) {
            (Some(code), Some(email)) => Some(PendingOtp { code, email }),
            _ => None,
        })
    }

    pub fn store_pending_otp(&self, pending: &PendingOtp) -> Result<(), StorageError> {
        self.transient.set(keys::CURRENT_OTP, &pending.code)?;
        self.transient.set(keys::PENDING_LOGIN_EMAIL, &pending.email)
    }

    pub fn clear_pending_otp(&self) -> Result<(), StorageError> {
        self.transient.remove(keys::CURRENT_OTP)?;
        self.transient.remove(keys::PENDING_LOGIN_EMAIL)
    }

    pub fn set_redirect_after_login(&self, target: &str) -> Result<(), StorageError> {
        self.transient.set(keys::REDIRECT_AFTER_LOGIN, target)
    }

    /// Read and forget the post-login redirect
    pub fn take_redirect_after_login(&self) -> Result<Option<String>, StorageError> {
        let target = self.transient.get(keys::REDIRECT_AFTER_LOGIN)?;
        if target.is_some() {
            self.transient.remove(keys::REDIRECT_AFTER_LOGIN)?;
        }
        Ok(target)
    }
}
