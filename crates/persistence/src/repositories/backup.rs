//! Full-database JSON backup and restore.
//!
//! Rows are dumped keyed by primary key; restore re-resolves foreign keys
//! by those ids and skips rows whose parent is missing. The activity log
//! is deliberately excluded from backups: it is an append-only audit
//! trail, not application data.

use chrono::Utc;
use domain::governorates;
use domain::models::{
    AccountRecord, BackupDocument, BackupMetadata, CandidateRecord, CitizenRecord,
    GovernorateRecord, MessageRecord, NewsRecord, PromiseRecord, RatingRecord, RestoreOptions,
    RestoreSummary, ServiceHistoryRecord, VoteRecord, BACKUP_VERSION,
};
use sqlx::{PgPool, Postgres, Transaction};

/// Repository for backup and restore.
#[derive(Clone)]
pub struct BackupRepository {
    pool: PgPool,
}

impl BackupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Dumps the whole database into a backup document.
    pub async fn dump(&self) -> Result<BackupDocument, sqlx::Error> {
        let accounts: Vec<AccountRecord> = sqlx::query_as::<_, (i64, String, String, String, String, bool, bool, chrono::DateTime<Utc>)>(
            "SELECT id, username, email, first_name, last_name, is_staff, is_active, date_joined \
             FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, username, email, first_name, last_name, is_staff, is_active, date_joined)| {
            AccountRecord { id, username, email, first_name, last_name, is_staff, is_active, date_joined }
        })
        .collect();

        let citizens: Vec<CitizenRecord> = sqlx::query_as::<_, (i64, i64, String, String, String, String, i32, String, String, String)>(
            "SELECT id, account_id, first_name, last_name, email, phone_number, governorate_id, \
             area_type, area_name, address FROM citizens ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, account_id, first_name, last_name, email, phone_number, governorate_id, area_type, area_name, address)| {
            CitizenRecord { id, account_id, first_name, last_name, email, phone_number, governorate_id, area_type, area_name, address }
        })
        .collect();

        let candidates: Vec<CandidateRecord> = sqlx::query_as::<_, (i64, i64, String, String, i32, String, String, String, String, bool, String, String)>(
            "SELECT id, account_id, name, role, governorate_id, constituency, bio, \
             electoral_program, message_to_voters, is_featured, election_symbol, election_number \
             FROM candidates ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, account_id, name, role, governorate_id, constituency, bio, electoral_program, message_to_voters, is_featured, election_symbol, election_number)| {
            CandidateRecord { id, account_id, name, role, governorate_id, constituency, bio, electoral_program, message_to_voters, is_featured, election_symbol, election_number }
        })
        .collect();

        let electoral_promises: Vec<PromiseRecord> = sqlx::query_as::<_, (i64, i64, String, String, i32)>(
            "SELECT id, candidate_id, title, description, display_order FROM electoral_promises ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, candidate_id, title, description, order)| PromiseRecord {
            id, candidate_id, title, description, order,
        })
        .collect();

        let service_history: Vec<ServiceHistoryRecord> = sqlx::query_as::<_, (i64, i64, i32, i32, String, String)>(
            "SELECT id, candidate_id, start_year, end_year, position, description FROM service_history ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, candidate_id, start_year, end_year, position, description)| ServiceHistoryRecord {
            id, candidate_id, start_year, end_year, position, description,
        })
        .collect();

        let messages: Vec<MessageRecord> = sqlx::query_as::<_, (i64, i64, Option<i64>, String, String, String, String, chrono::DateTime<Utc>, bool, Option<i64>)>(
            "SELECT id, candidate_id, sender_account_id, sender_name, sender_email, subject, \
             content, timestamp, is_read, reply_to FROM messages ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, candidate_id, sender_account_id, sender_name, sender_email, subject, content, timestamp, is_read, reply_to)| {
            MessageRecord { id, candidate_id, sender_account_id, sender_name, sender_email, subject, content, timestamp, is_read, reply_to }
        })
        .collect();

        let ratings: Vec<RatingRecord> = sqlx::query_as::<_, (i64, i64, i64, i32, String, chrono::DateTime<Utc>)>(
            "SELECT id, candidate_id, citizen_id, stars, comment, timestamp FROM ratings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, candidate_id, citizen_id, stars, comment, timestamp)| RatingRecord {
            id, candidate_id, citizen_id, stars, comment, timestamp,
        })
        .collect();

        let votes: Vec<VoteRecord> = sqlx::query_as::<_, crate::entities::VoteEntity>(
            "SELECT id, candidate_id, citizen_id, vote_type, timestamp FROM votes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|e| {
            let vote: domain::models::Vote = e.into();
            VoteRecord {
                id: vote.id,
                candidate_id: vote.candidate_id,
                citizen_id: vote.citizen_id,
                vote_type: vote.vote_type,
                timestamp: vote.timestamp,
            }
        })
        .collect();

        let news: Vec<NewsRecord> = sqlx::query_as::<_, crate::entities::NewsEntity>(
            "SELECT id, title, content, status, priority, show_on_homepage, show_on_ticker, \
             ticker_speed, publish_date, expire_date, author_id, views_count, meta_description, \
             tags, created_at, updated_at FROM news ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|e| {
            let item: domain::models::News = e.into();
            NewsRecord {
                id: item.id,
                title: item.title,
                content: item.content,
                status: item.status,
                priority: item.priority,
                show_on_homepage: item.show_on_homepage,
                show_on_ticker: item.show_on_ticker,
                ticker_speed: item.ticker_speed,
                publish_date: item.publish_date,
                expire_date: item.expire_date,
                author_id: item.author_id,
                meta_description: item.meta_description,
                tags: item.tags,
            }
        })
        .collect();

        let governorates = governorates::all()
            .iter()
            .map(|g| GovernorateRecord {
                id: g.id,
                name_ar: g.name_ar.to_string(),
                name_en: g.name_en.to_string(),
                slug: g.slug.to_string(),
                region: g.region.to_string(),
            })
            .collect();

        Ok(BackupDocument {
            metadata: BackupMetadata {
                backup_date: Utc::now(),
                version: BACKUP_VERSION.to_string(),
                description: "Naebak database backup".to_string(),
            },
            governorates,
            accounts,
            citizens,
            candidates,
            electoral_promises,
            service_history,
            messages,
            ratings,
            votes,
            news,
        })
    }

    /// Imports a backup document. Runs in one transaction: either the
    /// whole restore lands or none of it does.
    pub async fn restore(
        &self,
        doc: &BackupDocument,
        options: RestoreOptions,
    ) -> Result<RestoreSummary, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut summary = RestoreSummary::default();

        if options.clear_existing {
            // children before parents
            for table in [
                "messages",
                "rating_replies",
                "ratings",
                "votes",
                "service_history",
                "electoral_promises",
                "news",
                "candidates",
                "citizens",
                "accounts",
            ] {
                sqlx::query(&format!("DELETE FROM {}", table))
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for account in &doc.accounts {
            let result = sqlx::query(
                r#"
                INSERT INTO accounts (id, username, email, first_name, last_name, is_staff, is_active, date_joined)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(account.id)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.is_staff)
            .bind(account.is_active)
            .bind(account.date_joined)
            .execute(&mut *tx)
            .await?;
            summary.accounts += result.rows_affected();
        }

        for citizen in &doc.citizens {
            if !Self::exists(&mut tx, "accounts", citizen.account_id).await? {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                r#"
                INSERT INTO citizens (id, account_id, first_name, last_name, email, phone_number,
                                      governorate_id, area_type, area_name, address)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(citizen.id)
            .bind(citizen.account_id)
            .bind(&citizen.first_name)
            .bind(&citizen.last_name)
            .bind(&citizen.email)
            .bind(&citizen.phone_number)
            .bind(citizen.governorate_id)
            .bind(&citizen.area_type)
            .bind(&citizen.area_name)
            .bind(&citizen.address)
            .execute(&mut *tx)
            .await?;
            summary.citizens += result.rows_affected();
        }

        for candidate in &doc.candidates {
            if !Self::exists(&mut tx, "accounts", candidate.account_id).await? {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                r#"
                INSERT INTO candidates (id, account_id, name, role, governorate_id, constituency,
                                        bio, electoral_program, message_to_voters, is_featured,
                                        election_symbol, election_number)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(candidate.id)
            .bind(candidate.account_id)
            .bind(&candidate.name)
            .bind(&candidate.role)
            .bind(candidate.governorate_id)
            .bind(&candidate.constituency)
            .bind(&candidate.bio)
            .bind(&candidate.electoral_program)
            .bind(&candidate.message_to_voters)
            .bind(candidate.is_featured)
            .bind(&candidate.election_symbol)
            .bind(&candidate.election_number)
            .execute(&mut *tx)
            .await?;
            summary.candidates += result.rows_affected();
        }

        for promise in &doc.electoral_promises {
            if !Self::exists(&mut tx, "candidates", promise.candidate_id).await? {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                "INSERT INTO electoral_promises (id, candidate_id, title, description, display_order) \
                 VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING",
            )
            .bind(promise.id)
            .bind(promise.candidate_id)
            .bind(&promise.title)
            .bind(&promise.description)
            .bind(promise.order)
            .execute(&mut *tx)
            .await?;
            summary.electoral_promises += result.rows_affected();
        }

        for entry in &doc.service_history {
            if !Self::exists(&mut tx, "candidates", entry.candidate_id).await? {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                "INSERT INTO service_history (id, candidate_id, start_year, end_year, position, description) \
                 VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (id) DO NOTHING",
            )
            .bind(entry.id)
            .bind(entry.candidate_id)
            .bind(entry.start_year)
            .bind(entry.end_year)
            .bind(&entry.position)
            .bind(&entry.description)
            .execute(&mut *tx)
            .await?;
            summary.service_history += result.rows_affected();
        }

        // originals before replies so reply_to resolves
        let mut messages: Vec<&MessageRecord> = doc.messages.iter().collect();
        messages.sort_by_key(|m| m.reply_to.is_some());
        for message in messages {
            if !Self::exists(&mut tx, "candidates", message.candidate_id).await? {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                r#"
                INSERT INTO messages (id, candidate_id, sender_account_id, sender_name, sender_email,
                                      subject, content, timestamp, is_read, reply_to)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(message.id)
            .bind(message.candidate_id)
            .bind(message.sender_account_id)
            .bind(&message.sender_name)
            .bind(&message.sender_email)
            .bind(&message.subject)
            .bind(&message.content)
            .bind(message.timestamp)
            .bind(message.is_read)
            .bind(message.reply_to)
            .execute(&mut *tx)
            .await?;
            summary.messages += result.rows_affected();
        }

        for rating in &doc.ratings {
            if !Self::exists(&mut tx, "candidates", rating.candidate_id).await?
                || !Self::exists(&mut tx, "accounts", rating.citizen_id).await?
            {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                "INSERT INTO ratings (id, candidate_id, citizen_id, stars, comment, timestamp) \
                 VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
            )
            .bind(rating.id)
            .bind(rating.candidate_id)
            .bind(rating.citizen_id)
            .bind(rating.stars)
            .bind(&rating.comment)
            .bind(rating.timestamp)
            .execute(&mut *tx)
            .await?;
            summary.ratings += result.rows_affected();
        }

        for vote in &doc.votes {
            if !Self::exists(&mut tx, "candidates", vote.candidate_id).await?
                || !Self::exists(&mut tx, "accounts", vote.citizen_id).await?
            {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                "INSERT INTO votes (id, candidate_id, citizen_id, vote_type, timestamp) \
                 VALUES ($1, $2, $3, $4, $5) ON CONFLICT DO NOTHING",
            )
            .bind(vote.id)
            .bind(vote.candidate_id)
            .bind(vote.citizen_id)
            .bind(vote.vote_type.as_str())
            .bind(vote.timestamp)
            .execute(&mut *tx)
            .await?;
            summary.votes += result.rows_affected();
        }

        for item in &doc.news {
            if !Self::exists(&mut tx, "accounts", item.author_id).await? {
                summary.skipped += 1;
                continue;
            }
            let result = sqlx::query(
                r#"
                INSERT INTO news (id, title, content, status, priority, show_on_homepage,
                                  show_on_ticker, ticker_speed, publish_date, expire_date,
                                  author_id, meta_description, tags)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.content)
            .bind(item.status.as_str())
            .bind(item.priority.as_str())
            .bind(item.show_on_homepage)
            .bind(item.show_on_ticker)
            .bind(item.ticker_speed)
            .bind(item.publish_date)
            .bind(item.expire_date)
            .bind(item.author_id)
            .bind(&item.meta_description)
            .bind(&item.tags)
            .execute(&mut *tx)
            .await?;
            summary.news += result.rows_affected();
        }

        // explicit ids bypassed the sequences; advance them past the data
        for table in [
            "accounts",
            "citizens",
            "candidates",
            "electoral_promises",
            "service_history",
            "messages",
            "ratings",
            "votes",
            "news",
        ] {
            let sql = format!(
                "SELECT setval(pg_get_serial_sequence('{t}', 'id'), GREATEST((SELECT COALESCE(MAX(id), 1) FROM {t}), 1))",
                t = table
            );
            sqlx::query(&sql).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(summary)
    }

    async fn exists(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
        sqlx::query_scalar(&sql).bind(id).fetch_one(&mut **tx).await
    }
}
