use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Display name given to readers who have not signed in
pub const GUEST_NAME: &str = "Invité Faso";

/// A reader's session
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: String,
    pub name: String,
    pub is_premium: bool,
    /// Seconds read since the session started
    pub reading_time_today: u64,
    pub started_at: DateTime<Utc>,
}

impl UserSession {
    /// Create a fresh free-tier session
    pub fn new(name: &str) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            is_premium: false,
            reading_time_today: 0,
            started_at: Utc::now(),
        }
    }

    /// Start the session with reading time already spent
    pub fn with_reading_time(mut self, seconds: u64) -> Self {
        self.reading_time_today = seconds;
        self
    }

    /// Start the session as premium
    pub fn with_premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    pub(crate) fn record_tick(&mut self) {
        self.reading_time_today = self.reading_time_today.saturating_add(1);
    }
}

impl Default for UserSession {
    fn default() -> Self {
        Self::new(GUEST_NAME)
    }
}

/// Shared handle to the session owned by the application
///
/// Writes only happen through the reading tick process and
/// [`SharedSession::upgrade_to_premium`].
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<UserSession>>,
}

impl SharedSession {
    pub fn new(session: UserSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> UserSession {
        self.lock().clone()
    }

    pub fn is_premium(&self) -> bool {
        self.lock().is_premium
    }

    pub fn reading_time_today(&self) -> u64 {
        self.lock().reading_time_today
    }

    /// Flip the session to premium. Returns false if it already was.
    pub fn upgrade_to_premium(&self) -> bool {
        let mut session = self.lock();
        if session.is_premium {
            return false;
        }
        session.is_premium = true;
        tracing::info!("Session {} upgraded to premium", session.user_id);
        true
    }

    /// Never held across an await point
    pub(crate) fn lock(&self) -> MutexGuard<'_, UserSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_free_with_no_reading_time() {
        let session = UserSession::default();
        assert_eq!(session.name, GUEST_NAME);
        assert!(!session.is_premium);
        assert_eq!(session.reading_time_today, 0);
        assert!(Uuid::parse_str(&session.user_id).is_ok());
    }

    #[test]
    fn record_tick_adds_one_second() {
        let mut session = UserSession::default().with_reading_time(41);
        session.record_tick();
        assert_eq!(session.reading_time_today, 42);
    }

    #[test]
    fn upgrade_is_one_way_and_idempotent() {
        let shared = SharedSession::new(UserSession::default());
        assert!(shared.upgrade_to_premium());
        assert!(!shared.upgrade_to_premium());
        assert!(shared.is_premium());
    }

    #[test]
    fn clones_share_the_same_session() {
        let shared = SharedSession::new(UserSession::default());
        let other = shared.clone();
        other.lock().record_tick();
        assert_eq!(shared.reading_time_today(), 1);
    }
}
