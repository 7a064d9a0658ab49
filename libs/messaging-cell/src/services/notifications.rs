// libs/messaging-cell/src/services/notifications.rs
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::RecordStoreClient;

use crate::models::{MessagingError, Notification, NotificationKind};

pub struct NotificationService {
    store: Arc<RecordStoreClient>,
}

impl NotificationService {
    pub fn new(store: Arc<RecordStoreClient>) -> Self {
        Self { store }
    }

    pub async fn list_notifications(
        &self,
        recipient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Notification>, MessagingError> {
        debug!("Listing notifications for user {}", recipient_id);

        let path = format!(
            "/rest/v1/notifications?recipient_id=eq.{}&order=created_at.desc&limit=50",
            recipient_id
        );

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))
    }

    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
        auth_token: &str,
    ) -> Result<Notification, MessagingError> {
        let lookup = format!("/rest/v1/notifications?id=eq.{}", notification_id);

        let notification: Notification = self
            .store
            .fetch_one(&lookup, auth_token)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?
            .ok_or(MessagingError::NotificationNotFound)?;

        if notification.recipient_id != recipient_id {
            return Err(MessagingError::NotificationNotFound);
        }

        let path = format!("/rest/v1/notifications?id=eq.{}", notification_id);
        self.store
            .update(&path, auth_token, json!({ "is_read": true }))
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))
    }

    pub async fn record(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        body: &str,
        auth_token: &str,
    ) -> Result<Notification, MessagingError> {
        let notification_body = json!({
            "recipient_id": recipient_id,
            "kind": kind,
            "body": body,
            "is_read": false,
            "created_at": Utc::now(),
        });

        self.store
            .insert("/rest/v1/notifications", auth_token, notification_body)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))
    }
}
