//! Message repository.

use domain::models::{reply_subject, Message, MessageThread};
use shared::pagination::PageWindow;
use sqlx::PgPool;

use crate::entities::MessageEntity;

const MESSAGE_COLUMNS: &str = "id, candidate_id, sender_account_id, sender_name, sender_email, \
                               subject, content, attachment, timestamp, is_read, reply_to";

/// Input for sending a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub candidate_id: i64,
    pub sender_account_id: Option<i64>,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub content: String,
    pub attachment: Option<String>,
}

/// Repository for messages.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, input: &NewMessage) -> Result<Message, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO messages
                (candidate_id, sender_account_id, sender_name, sender_email, subject, content, attachment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        );

        let entity = sqlx::query_as::<_, MessageEntity>(&sql)
            .bind(input.candidate_id)
            .bind(input.sender_account_id)
            .bind(&input.sender_name)
            .bind(&input.sender_email)
            .bind(&input.subject)
            .bind(&input.content)
            .bind(&input.attachment)
            .fetch_one(&self.pool)
            .await?;

        Ok(entity.into())
    }

    /// Creates the candidate's reply to a message and marks the original
    /// read, in one transaction. The reply row is born read.
    pub async fn insert_reply(
        &self,
        original: &Message,
        sender_account_id: i64,
        sender_name: &str,
        sender_email: &str,
        content: &str,
    ) -> Result<Message, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO messages
                (candidate_id, sender_account_id, sender_name, sender_email,
                 subject, content, is_read, reply_to)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        );

        let entity = sqlx::query_as::<_, MessageEntity>(&sql)
            .bind(original.candidate_id)
            .bind(sender_account_id)
            .bind(sender_name)
            .bind(sender_email)
            .bind(reply_subject(&original.subject))
            .bind(content)
            .bind(original.id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
            .bind(original.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(entity.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Message>, sqlx::Error> {
        let sql = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);
        let entity = sqlx::query_as::<_, MessageEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// A message with its replies, for the thread page.
    pub async fn thread(&self, id: i64) -> Result<Option<MessageThread>, sqlx::Error> {
        let Some(message) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {} FROM messages WHERE reply_to = $1 ORDER BY timestamp",
            MESSAGE_COLUMNS
        );
        let replies = sqlx::query_as::<_, MessageEntity>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(MessageThread {
            message,
            replies: replies.into_iter().map(Into::into).collect(),
        }))
    }

    /// A candidate's inbox (top-level messages only), newest first, paged.
    pub async fn inbox(
        &self,
        candidate_id: i64,
        window: PageWindow,
    ) -> Result<(Vec<Message>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE candidate_id = $1 AND reply_to IS NULL",
        )
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {} FROM messages
            WHERE candidate_id = $1 AND reply_to IS NULL
            ORDER BY timestamp DESC
            LIMIT $2 OFFSET $3
            "#,
            MESSAGE_COLUMNS
        );
        let entities = sqlx::query_as::<_, MessageEntity>(&sql)
            .bind(candidate_id)
            .bind(window.per_page)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Marks every unread inbound message in the candidate's inbox read.
    /// Invoked by the inbox view; kept separate so the effect is testable
    /// on its own. Returns how many rows flipped.
    pub async fn mark_inbox_read(&self, candidate_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE WHERE candidate_id = $1 AND NOT is_read AND reply_to IS NULL",
        )
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn unread_count_for_candidate(&self, candidate_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE candidate_id = $1 AND NOT is_read AND reply_to IS NULL",
        )
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Messages an account has sent, newest first.
    pub async fn sent_by_account(&self, account_id: i64) -> Result<Vec<Message>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM messages WHERE sender_account_id = $1 ORDER BY timestamp DESC",
            MESSAGE_COLUMNS
        );
        let entities = sqlx::query_as::<_, MessageEntity>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Message>, sqlx::Error> {
        let sql = format!("SELECT {} FROM messages ORDER BY id", MESSAGE_COLUMNS);
        let entities = sqlx::query_as::<_, MessageEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
