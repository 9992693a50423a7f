use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};
use uuid::Uuid;

use crate::modules::users::application::domain::{OAuthBackend, TokenPurpose};
use crate::modules::users::application::ports::outgoing::{
    OAuthStateStore, TokenCache, TokenCacheError,
};

/// `TokenCache` and `OAuthStateStore` backed by `HashMap`s. TTLs are recorded
/// but never enforced.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, (String, u64)>>,
    states: Mutex<HashMap<(OAuthBackend, String), u64>>,
    unavailable: AtomicBool,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn ttl_of(&self, purpose: TokenPurpose, user_id: Uuid) -> Option<u64> {
        self.entries
            .lock()
            .unwrap()
            .get(&purpose.cache_key(user_id))
            .map(|(_, ttl)| *ttl)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), TokenCacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TokenCacheError::ConnectionError(
                "cache unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
    ) -> Result<Option<String>, TokenCacheError> {
        self.check()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&purpose.cache_key(user_id))
            .map(|(token, _)| token.clone()))
    }

    async fn store(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), TokenCacheError> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(purpose.cache_key(user_id), (token.to_string(), ttl_secs));
        Ok(())
    }

    async fn revoke(&self, purpose: TokenPurpose, user_id: Uuid) -> Result<(), TokenCacheError> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .remove(&purpose.cache_key(user_id));
        Ok(())
    }

    async fn revoke_many(
        &self,
        purposes: &[TokenPurpose],
        user_id: Uuid,
    ) -> Result<(), TokenCacheError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        for purpose in purposes {
            entries.remove(&purpose.cache_key(user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl OAuthStateStore for InMemoryTokenCache {
    async fn save_state(
        &self,
        backend: OAuthBackend,
        state: &str,
        ttl_secs: u64,
    ) -> Result<(), TokenCacheError> {
        self.check()?;
        self.states
            .lock()
            .unwrap()
            .insert((backend, state.to_string()), ttl_secs);
        Ok(())
    }

    async fn take_state(
        &self,
        backend: OAuthBackend,
        state: &str,
    ) -> Result<bool, TokenCacheError> {
        self.check()?;
        Ok(self
            .states
            .lock()
            .unwrap()
            .remove(&(backend, state.to_string()))
            .is_some())
    }
}
