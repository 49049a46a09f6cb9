//! # User Repository
//!
//! Username lookup and login.
//!
//! ## Login Flow
//! ```text
//! authenticate("cashier", "cashier123")
//!      │
//!      ▼
//! find_by_username ──► None ──────────────┐
//!      │                                   │
//!      ▼                                   ▼
//! password matches? ──► no ──► StoreError::InvalidCredentials
//!      │
//!      ▼ yes
//! Session { token: uuid v4, user: UserProfile, issued_at: now }
//!      (valid for 24 hours, never written to the document)
//! ```

use chrono::Utc;
use shopease_core::{Session, User};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::repository::collection::Collection;

/// Repository for login accounts.
pub type UserRepository = Collection<User>;

impl Collection<User> {
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let username = username.trim();
        debug!(username = %username, "Fetching user by username");

        self.store()
            .read(|doc| doc.users.iter().find(|u| u.username == username).cloned())
            .await
    }

    /// Checks the credentials and issues a session.
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<Session> {
        match self.find_by_username(username).await? {
            Some(user) if user.password == password => {
                let session = Session::issue(&user, Utc::now());
                info!(
                    username = %user.username,
                    role = user.role.as_str(),
                    "User logged in"
                );
                Ok(session)
            }
            _ => {
                warn!(username = %username.trim(), "Failed login attempt");
                Err(StoreError::InvalidCredentials)
            }
        }
    }
}
