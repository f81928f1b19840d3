//! Shared application state.

use chrono::{NaiveDate, Utc};
use endurance_config::{DashboardConfig, EnduranceConfig};
use endurance_core::FallbackTable;
use endurance_relay::Relay;
use endurance_stores::Stores;

use crate::respond::ApiError;

/// Everything a handler needs, built once at startup and shared behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub stores: Stores,
    pub relay: Relay,
    pub fallbacks: FallbackTable,
    pub dashboard: DashboardConfig,
}

impl AppState {
    /// Build store adapters and relay clients. Nothing here touches the
    /// network; the first request opens connections.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if an adapter or HTTP client cannot be built.
    pub fn from_config(config: &EnduranceConfig) -> Result<Self, ApiError> {
        Ok(Self {
            stores: Stores::from_config(config)?,
            relay: Relay::from_config(config)?,
            fallbacks: FallbackTable::new(config.fallbacks.clone()),
            dashboard: config.dashboard.clone(),
        })
    }

    /// Today's date in UTC, used for tenure and default windows.
    #[must_use]
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}
