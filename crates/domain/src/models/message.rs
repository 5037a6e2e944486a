//! Citizen-to-candidate messaging models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum subject length.
pub const MAX_SUBJECT_LEN: usize = 300;
/// Maximum message body length.
pub const MAX_CONTENT_LEN: usize = 5000;

/// A message addressed to a candidate. A reply is a second row in the same
/// table with `reply_to` pointing at the original, so threads are two
/// levels deep at most.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub candidate_id: i64,
    /// Sender account, when the sender was logged in.
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

/// Payload for sending a message. Anonymous senders must supply a name
/// and a valid email; authenticated senders have theirs filled in from
/// the account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
}

impl SendMessageInput {
    /// Field checks shared by the authenticated and anonymous paths.
    pub fn validate_fields(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() || self.content.trim().is_empty() {
            return Err("يرجى ملء جميع الحقول المطلوبة".to_string());
        }
        if self.subject.chars().count() > MAX_SUBJECT_LEN {
            return Err("موضوع الرسالة طويل جداً".to_string());
        }
        if self.content.chars().count() > MAX_CONTENT_LEN {
            return Err("محتوى الرسالة طويل جداً".to_string());
        }
        Ok(())
    }
}

/// Payload for a candidate's reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessageInput {
    pub content: String,
}

/// Subject line for a reply to the given original subject.
pub fn reply_subject(original: &str) -> String {
    format!("رد: {}", original)
}

/// A message with its replies, as shown on the thread page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageThread {
    pub message: Message,
    pub replies: Vec<Message>,
}

/// One entry in the notifications poll response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: String,
    pub count: i64,
    pub text: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(subject: &str, content: &str) -> SendMessageInput {
        SendMessageInput {
            subject: subject.to_string(),
            content: content.to_string(),
            attachment: None,
            sender_name: None,
            sender_email: None,
        }
    }

    #[test]
    fn test_validate_fields_ok() {
        assert!(input("استفسار", "ما موقفكم من قانون التعليم؟")
            .validate_fields()
            .is_ok());
    }

    #[test]
    fn test_validate_fields_requires_subject_and_content() {
        assert!(input("", "محتوى").validate_fields().is_err());
        assert!(input("موضوع", "   ").validate_fields().is_err());
    }

    #[test]
    fn test_validate_fields_length_bounds() {
        let long_subject = "م".repeat(MAX_SUBJECT_LEN + 1);
        assert!(input(&long_subject, "محتوى").validate_fields().is_err());

        let long_content = "م".repeat(MAX_CONTENT_LEN + 1);
        assert!(input("موضوع", &long_content).validate_fields().is_err());

        let at_limit = "م".repeat(MAX_CONTENT_LEN);
        assert!(input("موضوع", &at_limit).validate_fields().is_ok());
    }

    #[test]
    fn test_reply_subject() {
        assert_eq!(reply_subject("استفسار"), "رد: استفسار");
    }
}
