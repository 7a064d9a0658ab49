// libs/calendar-cell/src/services/accounts.rs
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use shared_database::RecordStoreClient;

use crate::models::{CalendarAccount, CalendarError};

/// Looks up which staff members have a Google Calendar connected. Rows are
/// written by the account-linking flow on the managed platform; this service
/// only reads them.
pub struct CalendarAccountService {
    store: Arc<RecordStoreClient>,
}

impl CalendarAccountService {
    pub fn new(store: Arc<RecordStoreClient>) -> Self {
        Self { store }
    }

    /// All accounts that opted into appointment mirroring.
    pub async fn list_sync_enabled_accounts(
        &self,
        auth_token: &str,
    ) -> Result<Vec<CalendarAccount>, CalendarError> {
        debug!("Loading sync-enabled calendar accounts");

        let path = "/rest/v1/calendar_accounts?sync_enabled=eq.true&order=user_id.asc";

        self.store
            .fetch_list(path, auth_token)
            .await
            .map_err(|e| CalendarError::AccountLookupFailed(e.to_string()))
    }

    /// The connected account for one user, if any.
    pub async fn account_for_user(
        &self,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<CalendarAccount>, CalendarError> {
        let path = format!("/rest/v1/calendar_accounts?user_id=eq.{}", user_id);

        self.store
            .fetch_one(&path, auth_token)
            .await
            .map_err(|e| CalendarError::AccountLookupFailed(e.to_string()))
    }
}
