// libs/messaging-cell/src/services/visibility.rs
//
// Pure per-user visibility rules for threads and messages. Deletion never
// destroys data another participant can still see; it only hides rows for
// the deleting user. The storage layer applies these decisions.

use uuid::Uuid;

use crate::models::{Message, MessageThread};

/// A thread is visible to a user while they participate in it and have not
/// deleted it for themselves.
pub fn thread_visible_to(thread: &MessageThread, user_id: Uuid) -> bool {
    thread.participant_ids.contains(&user_id) && !thread.hidden_for.contains(&user_id)
}

pub fn visible_threads(threads: Vec<MessageThread>, user_id: Uuid) -> Vec<MessageThread> {
    threads
        .into_iter()
        .filter(|thread| thread_visible_to(thread, user_id))
        .collect()
}

/// Hide the thread for one user only. Idempotent.
pub fn hide_thread_for(thread: &mut MessageThread, user_id: Uuid) {
    if !thread.hidden_for.contains(&user_id) {
        thread.hidden_for.push(user_id);
    }
}

/// A new message brings the thread back for everyone who had deleted it.
pub fn restore_thread_for_all(thread: &mut MessageThread) {
    thread.hidden_for.clear();
}

/// Once every participant has deleted the thread it can be purged for real.
pub fn thread_fully_hidden(thread: &MessageThread) -> bool {
    thread
        .participant_ids
        .iter()
        .all(|participant| thread.hidden_for.contains(participant))
}

pub fn visible_messages(messages: Vec<Message>, user_id: Uuid) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|message| !message.hidden_for.contains(&user_id))
        .collect()
}

/// Unread = visible, authored by someone else, and not yet marked read.
pub fn unread_count(messages: &[Message], user_id: Uuid) -> usize {
    messages
        .iter()
        .filter(|message| {
            !message.hidden_for.contains(&user_id)
                && message.sender_id != user_id
                && !message.read_by.contains(&user_id)
        })
        .count()
}
