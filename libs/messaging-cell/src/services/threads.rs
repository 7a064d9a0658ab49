// libs/messaging-cell/src/services/threads.rs
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::RecordStoreClient;

use crate::models::{
    Message, MessageThread, MessagingError, NotificationKind, SendMessageRequest,
    StartThreadRequest, ThreadSummary,
};
use crate::services::notifications::NotificationService;
use crate::services::visibility;

/// Store-backed thread operations. All read paths filter through the pure
/// visibility rules before anything reaches a caller.
pub struct ThreadService {
    store: Arc<RecordStoreClient>,
    notifications: NotificationService,
}

impl ThreadService {
    pub fn new(store: Arc<RecordStoreClient>) -> Self {
        let notifications = NotificationService::new(Arc::clone(&store));
        Self {
            store,
            notifications,
        }
    }

    /// Threads this user can still see, newest activity first, with unread
    /// tallies.
    pub async fn list_threads(
        &self,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<ThreadSummary>, MessagingError> {
        debug!("Listing threads for user {}", user_id);

        let path = format!(
            "/rest/v1/message_threads?participant_ids=cs.{{{}}}&order=last_message_at.desc.nullslast",
            user_id
        );

        let threads: Vec<MessageThread> = self
            .store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        let mut summaries = Vec::new();

        for thread in visibility::visible_threads(threads, user_id) {
            let messages = self.thread_messages(thread.id, auth_token).await?;
            let unread_count = visibility::unread_count(&messages, user_id);
            summaries.push(ThreadSummary {
                thread,
                unread_count,
            });
        }

        Ok(summaries)
    }

    /// One thread's messages as this user sees them.
    pub async fn get_thread_messages(
        &self,
        thread_id: Uuid,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<(MessageThread, Vec<Message>), MessagingError> {
        let thread = self.load_thread(thread_id, auth_token).await?;

        if !thread.participant_ids.contains(&user_id) {
            return Err(MessagingError::NotParticipant);
        }
        // A thread the user deleted is gone from their point of view.
        if !visibility::thread_visible_to(&thread, user_id) {
            return Err(MessagingError::ThreadNotFound);
        }

        let messages = self.thread_messages(thread_id, auth_token).await?;
        let visible = visibility::visible_messages(messages, user_id);

        Ok((thread, visible))
    }

    pub async fn start_thread(
        &self,
        sender_id: Uuid,
        request: StartThreadRequest,
        auth_token: &str,
    ) -> Result<MessageThread, MessagingError> {
        if request.body.trim().is_empty() {
            return Err(MessagingError::ValidationError(
                "Message body cannot be empty".to_string(),
            ));
        }

        let mut participant_ids = request.participant_ids;
        if !participant_ids.contains(&sender_id) {
            participant_ids.push(sender_id);
        }
        if participant_ids.len() < 2 {
            return Err(MessagingError::ValidationError(
                "A thread needs at least two participants".to_string(),
            ));
        }

        let now = Utc::now();
        let thread_body = json!({
            "subject": request.subject,
            "participant_ids": participant_ids,
            "hidden_for": [],
            "last_message_at": now,
            "created_at": now,
            "updated_at": now,
        });

        let thread: MessageThread = self
            .store
            .insert("/rest/v1/message_threads", auth_token, thread_body)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        self.insert_message(thread.id, sender_id, &request.body, auth_token)
            .await?;

        info!("Thread {} started by {}", thread.id, sender_id);

        self.notify_participants(&thread, sender_id, auth_token).await;

        Ok(thread)
    }

    pub async fn send_message(
        &self,
        thread_id: Uuid,
        sender_id: Uuid,
        request: SendMessageRequest,
        auth_token: &str,
    ) -> Result<Message, MessagingError> {
        if request.body.trim().is_empty() {
            return Err(MessagingError::ValidationError(
                "Message body cannot be empty".to_string(),
            ));
        }

        let mut thread = self.load_thread(thread_id, auth_token).await?;

        if !thread.participant_ids.contains(&sender_id) {
            return Err(MessagingError::NotParticipant);
        }

        let message = self
            .insert_message(thread_id, sender_id, &request.body, auth_token)
            .await?;

        // New activity resurrects the thread for participants who deleted it.
        visibility::restore_thread_for_all(&mut thread);

        let path = format!("/rest/v1/message_threads?id=eq.{}", thread_id);
        let body = json!({
            "hidden_for": thread.hidden_for,
            "last_message_at": message.sent_at,
            "updated_at": Utc::now(),
        });

        let _: MessageThread = self
            .store
            .update(&path, auth_token, body)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        self.notify_participants(&thread, sender_id, auth_token).await;

        Ok(message)
    }

    /// Mark every unread message in the thread as read by this user.
    pub async fn mark_thread_read(
        &self,
        thread_id: Uuid,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<usize, MessagingError> {
        let thread = self.load_thread(thread_id, auth_token).await?;

        if !thread.participant_ids.contains(&user_id) {
            return Err(MessagingError::NotParticipant);
        }

        let messages = self.thread_messages(thread_id, auth_token).await?;
        let mut marked = 0;

        for message in messages {
            let already_read =
                message.sender_id == user_id || message.read_by.contains(&user_id);
            if already_read || message.hidden_for.contains(&user_id) {
                continue;
            }

            let mut read_by = message.read_by.clone();
            read_by.push(user_id);

            let path = format!("/rest/v1/messages?id=eq.{}", message.id);
            let body = json!({ "read_by": read_by });

            let _: Message = self
                .store
                .update(&path, auth_token, body)
                .await
                .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

            marked += 1;
        }

        Ok(marked)
    }

    /// Delete the thread for this user only. The row and its messages are
    /// purged once every participant has deleted it.
    pub async fn delete_thread_for_user(
        &self,
        thread_id: Uuid,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<(), MessagingError> {
        let mut thread = self.load_thread(thread_id, auth_token).await?;

        if !thread.participant_ids.contains(&user_id) {
            return Err(MessagingError::NotParticipant);
        }

        visibility::hide_thread_for(&mut thread, user_id);

        if visibility::thread_fully_hidden(&thread) {
            info!("Thread {} hidden by all participants, purging", thread_id);

            let messages_path = format!("/rest/v1/messages?thread_id=eq.{}", thread_id);
            self.store
                .delete(&messages_path, auth_token)
                .await
                .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

            let thread_path = format!("/rest/v1/message_threads?id=eq.{}", thread_id);
            self.store
                .delete(&thread_path, auth_token)
                .await
                .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

            return Ok(());
        }

        let path = format!("/rest/v1/message_threads?id=eq.{}", thread_id);
        let body = json!({
            "hidden_for": thread.hidden_for,
            "updated_at": Utc::now(),
        });

        let _: MessageThread = self
            .store
            .update(&path, auth_token, body)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn load_thread(
        &self,
        thread_id: Uuid,
        auth_token: &str,
    ) -> Result<MessageThread, MessagingError> {
        let path = format!("/rest/v1/message_threads?id=eq.{}", thread_id);

        self.store
            .fetch_one(&path, auth_token)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?
            .ok_or(MessagingError::ThreadNotFound)
    }

    async fn thread_messages(
        &self,
        thread_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Message>, MessagingError> {
        let path = format!(
            "/rest/v1/messages?thread_id=eq.{}&order=sent_at.asc",
            thread_id
        );

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))
    }

    async fn insert_message(
        &self,
        thread_id: Uuid,
        sender_id: Uuid,
        body: &str,
        auth_token: &str,
    ) -> Result<Message, MessagingError> {
        let message_body = json!({
            "thread_id": thread_id,
            "sender_id": sender_id,
            "body": body,
            "sent_at": Utc::now(),
            "read_by": [sender_id],
            "hidden_for": [],
        });

        self.store
            .insert("/rest/v1/messages", auth_token, message_body)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))
    }

    /// Best-effort new-message notifications for the other participants; a
    /// failed write is logged and skipped, never surfaced to the sender.
    async fn notify_participants(&self, thread: &MessageThread, sender_id: Uuid, auth_token: &str) {
        for participant in &thread.participant_ids {
            if *participant == sender_id {
                continue;
            }

            let body = match &thread.subject {
                Some(subject) => format!("New message in \"{}\"", subject),
                None => "New message in a conversation".to_string(),
            };

            if let Err(e) = self
                .notifications
                .record(*participant, NotificationKind::NewMessage, &body, auth_token)
                .await
            {
                warn!(
                    "Failed to record notification for user {}: {}",
                    participant, e
                );
            }
        }
    }
}
