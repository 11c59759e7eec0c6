//! Guest lookup
//!
//! The guest register is fetched once per session and filtered locally as
//! the clerk types.

use crate::error::{DeskError, ValidationError};
use crate::ports::GuestGateway;
use parking_lot::Mutex;
use sbb_model::{Guest, NewGuest};
use std::sync::Arc;

/// Session cache of guests with substring lookup
pub struct GuestMatcher {
    gateway: Arc<dyn GuestGateway>,
    cache: Mutex<Option<Vec<Guest>>>,
}

impl GuestMatcher {
    #[must_use]
    pub fn new(gateway: Arc<dyn GuestGateway>) -> Self {
        Self {
            gateway,
            cache: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cache.lock().is_some()
    }

    /// Fetch the register unless already loaded. Returns the cached count.
    pub async fn load(&self) -> Result<usize, DeskError> {
        let cached = self.cache.lock().as_ref().map(Vec::len);
        match cached {
            Some(count) => Ok(count),
            None => self.reload().await,
        }
    }

    /// Fetch the register again, replacing the cache.
    pub async fn reload(&self) -> Result<usize, DeskError> {
        let guests = self.gateway.all().await.map_err(|e| {
            tracing::warn!(error = %e, "guest register unavailable");
            e
        })?;
        let count = guests.len();
        *self.cache.lock() = Some(guests);
        tracing::debug!(count, "guest register loaded");
        Ok(count)
    }

    /// Guests whose first or last name contains `query`, ignoring case.
    ///
    /// A blank query returns every cached guest. Nothing is returned before
    /// the register is loaded.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<Guest> {
        let needle = query.trim().to_lowercase();
        let cache = self.cache.lock();
        let Some(guests) = cache.as_ref() else {
            return Vec::new();
        };
        if needle.is_empty() {
            return guests.clone();
        }
        guests
            .iter()
            .filter(|g| g.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// Non-blank query with no match: the picker offers to register a guest
    #[must_use]
    pub fn is_unknown(&self, query: &str) -> bool {
        !query.trim().is_empty() && self.filter(query).is_empty()
    }

    /// Register a guest remotely and add it to the cache.
    pub async fn register(&self, guest: NewGuest) -> Result<Guest, DeskError> {
        if guest.first_name.trim().is_empty() || guest.last_name.trim().is_empty() {
            return Err(ValidationError::MissingGuestName.into());
        }
        let created = self.gateway.create(guest).await.map_err(|e| {
            tracing::warn!(error = %e, "guest registration refused");
            e
        })?;
        tracing::info!(guest = %created.id, "guest registered");
        if let Some(guests) = self.cache.lock().as_mut() {
            guests.push(created.clone());
        }
        Ok(created)
    }
}

impl std::fmt::Debug for GuestMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestMatcher")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
