/*
[INPUT]:  Connected wallet address and session lifetime
[OUTPUT]: Session activity and expiration status
[POS]:    Auth layer - provider session lifecycle
[UPDATE]: When adding session refresh or changing expiry rules
*/

use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::Address;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Stored session data with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: Uuid,
    pub address: Address,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe session clock shared by a provider and its handles
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    data: Arc<RwLock<Option<SessionData>>>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `address` lasting `seconds`
    pub fn start(&self, address: Address, seconds: u64) -> SessionData {
        let started_at = Utc::now();
        let expires_at = i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| started_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let data = SessionData {
            session_id: Uuid::new_v4(),
            address,
            started_at,
            expires_at,
        };

        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(data.clone());
        data
    }

    /// Current session, if one was started and has not been cleared
    pub fn current(&self) -> Option<SessionData> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// True while a session exists and has not expired
    pub fn is_active(&self) -> bool {
        self.current()
            .map(|data| !data.is_expired_at(Utc::now()))
            .unwrap_or(false)
    }

    /// True when a session exists but ran past its expiry
    pub fn is_expired(&self) -> bool {
        self.current()
            .map(|data| data.is_expired_at(Utc::now()))
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}
