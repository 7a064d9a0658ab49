// libs/appointment-cell/src/services/calendar_sync.rs
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use calendar_cell::models::{CalendarAccount, CalendarError, EventDateTime, EventInput};
use calendar_cell::services::{CalendarAccountService, GoogleCalendarClient};
use shared_config::AppConfig;
use shared_database::RecordStoreClient;

use crate::models::{
    Appointment, AppointmentCalendarEvent, CalendarSyncReport, SyncAction, SyncFailure,
    SyncedCalendar,
};

const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Mirrors appointment changes into every connected staff calendar.
///
/// The fan-out is best effort: one sequential attempt per calendar, no
/// retries, and a failure for one user never aborts the rest. The outcome
/// is returned as data in a [`CalendarSyncReport`].
pub struct CalendarSyncService {
    store: Arc<RecordStoreClient>,
    accounts: CalendarAccountService,
    calendar: GoogleCalendarClient,
}

impl CalendarSyncService {
    pub fn new(store: Arc<RecordStoreClient>, config: &AppConfig) -> Result<Self, CalendarError> {
        let calendar = GoogleCalendarClient::new(config)?;
        let accounts = CalendarAccountService::new(Arc::clone(&store));

        Ok(Self {
            store,
            accounts,
            calendar,
        })
    }

    pub async fn push_appointment(
        &self,
        appointment: &Appointment,
        action: SyncAction,
        auth_token: &str,
    ) -> Result<CalendarSyncReport, CalendarError> {
        let accounts = self.accounts.list_sync_enabled_accounts(auth_token).await?;

        info!(
            "Syncing appointment {} ({:?}) to {} connected calendars",
            appointment.id,
            action,
            accounts.len()
        );

        let mut report = CalendarSyncReport {
            attempted: accounts.len(),
            ..Default::default()
        };

        for account in accounts {
            match self
                .push_to_account(appointment, action, &account, auth_token)
                .await
            {
                Ok(Some(synced)) => report.synced.push(synced),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        "Calendar sync failed for user {} on appointment {}: {}",
                        account.user_id, appointment.id, error
                    );
                    report.failures.push(SyncFailure {
                        user_id: account.user_id,
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn push_to_account(
        &self,
        appointment: &Appointment,
        action: SyncAction,
        account: &CalendarAccount,
        auth_token: &str,
    ) -> Result<Option<SyncedCalendar>, String> {
        match action {
            SyncAction::Created => {
                let event = self
                    .calendar
                    .insert_event(
                        &account.calendar_id,
                        &account.access_token,
                        &event_payload(appointment),
                    )
                    .await
                    .map_err(|e| e.to_string())?;

                self.record_event_link(appointment.id, account, &event.id, auth_token)
                    .await?;

                Ok(Some(SyncedCalendar {
                    user_id: account.user_id,
                    calendar_id: account.calendar_id.clone(),
                    event_id: event.id,
                }))
            }
            SyncAction::Updated => {
                match self
                    .event_link(appointment.id, account.user_id, auth_token)
                    .await?
                {
                    Some(link) => {
                        self.calendar
                            .patch_event(
                                &account.calendar_id,
                                &link.event_id,
                                &account.access_token,
                                &event_payload(appointment),
                            )
                            .await
                            .map_err(|e| e.to_string())?;

                        Ok(Some(SyncedCalendar {
                            user_id: account.user_id,
                            calendar_id: account.calendar_id.clone(),
                            event_id: link.event_id,
                        }))
                    }
                    None => {
                        // The appointment predates this calendar connection;
                        // create the missing copy instead.
                        let event = self
                            .calendar
                            .insert_event(
                                &account.calendar_id,
                                &account.access_token,
                                &event_payload(appointment),
                            )
                            .await
                            .map_err(|e| e.to_string())?;

                        self.record_event_link(appointment.id, account, &event.id, auth_token)
                            .await?;

                        Ok(Some(SyncedCalendar {
                            user_id: account.user_id,
                            calendar_id: account.calendar_id.clone(),
                            event_id: event.id,
                        }))
                    }
                }
            }
            SyncAction::Cancelled => {
                match self
                    .event_link(appointment.id, account.user_id, auth_token)
                    .await?
                {
                    Some(link) => {
                        self.calendar
                            .delete_event(&account.calendar_id, &link.event_id, &account.access_token)
                            .await
                            .map_err(|e| e.to_string())?;

                        self.remove_event_link(link.id, auth_token).await?;

                        Ok(Some(SyncedCalendar {
                            user_id: account.user_id,
                            calendar_id: account.calendar_id.clone(),
                            event_id: link.event_id,
                        }))
                    }
                    None => Ok(None),
                }
            }
        }
    }

    // ==============================================================================
    // EVENT LINK BOOKKEEPING
    // ==============================================================================

    async fn event_link(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<Option<AppointmentCalendarEvent>, String> {
        let path = format!(
            "/rest/v1/appointment_calendar_events?appointment_id=eq.{}&user_id=eq.{}",
            appointment_id, user_id
        );

        self.store
            .fetch_one(&path, auth_token)
            .await
            .map_err(|e| e.to_string())
    }

    async fn record_event_link(
        &self,
        appointment_id: Uuid,
        account: &CalendarAccount,
        event_id: &str,
        auth_token: &str,
    ) -> Result<(), String> {
        let body = json!({
            "appointment_id": appointment_id,
            "user_id": account.user_id,
            "calendar_id": account.calendar_id,
            "event_id": event_id,
        });

        let _: AppointmentCalendarEvent = self
            .store
            .insert("/rest/v1/appointment_calendar_events", auth_token, body)
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn remove_event_link(&self, link_id: Uuid, auth_token: &str) -> Result<(), String> {
        let path = format!("/rest/v1/appointment_calendar_events?id=eq.{}", link_id);
        self.store
            .delete(&path, auth_token)
            .await
            .map_err(|e| e.to_string())
    }
}

fn event_payload(appointment: &Appointment) -> EventInput {
    let summary = match appointment.session_type {
        Some(session_type) => format!("Clinic session ({})", session_type),
        None => "Clinic session".to_string(),
    };

    EventInput {
        summary,
        description: appointment.notes.clone(),
        location: appointment.location.clone(),
        start: EventDateTime {
            date_time: appointment
                .date_of_session
                .format(EVENT_TIME_FORMAT)
                .to_string(),
            time_zone: None,
        },
        end: EventDateTime {
            date_time: appointment
                .end_of_session()
                .format(EVENT_TIME_FORMAT)
                .to_string(),
            time_zone: None,
        },
    }
}
