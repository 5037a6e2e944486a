//! Message entity.

use chrono::{DateTime, Utc};
use domain::models::Message;
use sqlx::FromRow;

/// Database entity for messages.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: i64,
    pub candidate_id: i64,
    pub sender_account_id: Option<i64>,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub content: String,
    pub attachment: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub reply_to: Option<i64>,
}

impl From<MessageEntity> for Message {
    fn from(e: MessageEntity) -> Self {
        Message {
            id: e.id,
            candidate_id: e.candidate_id,
            sender_account_id: e.sender_account_id,
            sender_name: e.sender_name,
            sender_email: e.sender_email,
            subject: e.subject,
            content: e.content,
            attachment: e.attachment,
            timestamp: e.timestamp,
            is_read: e.is_read,
            reply_to: e.reply_to,
        }
    }
}
