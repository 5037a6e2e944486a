//! Full-database JSON backup and restore documents.
//!
//! Bulk data interchange keyed by primary key. Restore re-resolves foreign
//! keys by the dumped ids; this is not a versioned migration format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::{NewsPriority, NewsStatus, VoteType};

/// Format version written into backups. Free-text; there is no schema
/// negotiation on restore.
pub const BACKUP_VERSION: &str = "1.0";

/// Backup file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub backup_date: DateTime<Utc>,
    pub version: String,
    pub description: String,
}

/// Account record in a backup. Password hashes are deliberately excluded;
/// restored accounts cannot log in until a password reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenRecord {
    pub id: i64,
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub governorate_id: i32,
    pub area_type: String,
    pub area_name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub role: String,
    pub governorate_id: i32,
    pub constituency: String,
    pub bio: String,
    pub electoral_program: String,
    pub message_to_voters: String,
    pub is_featured: bool,
    pub election_symbol: String,
    pub election_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromiseRecord {
    pub id: i64,
    pub candidate_id: i64,
    pub title: String,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHistoryRecord {
    pub id: i64,
    pub candidate_id: i64,
    pub start_year: i32,
    pub end_year: i32,
    pub position: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: i64,
    pub candidate_id: i64,
    pub sender_account_id: Option<i64>,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub reply_to: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub id: i64,
    pub candidate_id: i64,
    pub citizen_id: i64,
    pub stars: i32,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub id: i64,
    pub candidate_id: i64,
    pub citizen_id: i64,
    pub vote_type: VoteType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: NewsStatus,
    pub priority: NewsPriority,
    pub show_on_homepage: bool,
    pub show_on_ticker: bool,
    pub ticker_speed: i32,
    pub publish_date: DateTime<Utc>,
    pub expire_date: Option<DateTime<Utc>>,
    pub author_id: i64,
    pub meta_description: String,
    pub tags: String,
}

/// Snapshot of the static governorate table, included so a backup is
/// readable without this codebase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateRecord {
    pub id: i32,
    pub name_ar: String,
    pub name_en: String,
    pub slug: String,
    pub region: String,
}

/// The full backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub metadata: BackupMetadata,
    pub governorates: Vec<GovernorateRecord>,
    pub accounts: Vec<AccountRecord>,
    pub citizens: Vec<CitizenRecord>,
    pub candidates: Vec<CandidateRecord>,
    pub electoral_promises: Vec<PromiseRecord>,
    pub service_history: Vec<ServiceHistoryRecord>,
    pub messages: Vec<MessageRecord>,
    pub ratings: Vec<RatingRecord>,
    pub votes: Vec<VoteRecord>,
    pub news: Vec<NewsRecord>,
}

impl BackupDocument {
    /// Structural validation before a restore touches anything.
    pub fn validate_structure(value: &JsonValue) -> Result<(), String> {
        for key in ["metadata", "governorates", "accounts", "candidates"] {
            if value.get(key).is_none() {
                return Err("هيكل الملف غير صحيح".to_string());
            }
        }
        Ok(())
    }
}

/// Restore options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOptions {
    /// Delete existing rows (children before parents) before importing.
    #[serde(default)]
    pub clear_existing: bool,
}

/// What a restore actually imported.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub accounts: u64,
    pub citizens: u64,
    pub candidates: u64,
    pub electoral_promises: u64,
    pub service_history: u64,
    pub messages: u64,
    pub ratings: u64,
    pub votes: u64,
    pub news: u64,
    /// Rows skipped because a referenced parent was missing.
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_structure_accepts_complete_document() {
        let doc = json!({
            "metadata": {},
            "governorates": [],
            "accounts": [],
            "candidates": [],
        });
        assert!(BackupDocument::validate_structure(&doc).is_ok());
    }

    #[test]
    fn test_validate_structure_rejects_missing_sections() {
        let doc = json!({ "metadata": {}, "accounts": [] });
        assert_eq!(
            BackupDocument::validate_structure(&doc).unwrap_err(),
            "هيكل الملف غير صحيح"
        );
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let doc = BackupDocument {
            metadata: BackupMetadata {
                backup_date: Utc::now(),
                version: BACKUP_VERSION.to_string(),
                description: "Naebak database backup".to_string(),
            },
            governorates: vec![],
            accounts: vec![AccountRecord {
                id: 1,
                username: "admin".to_string(),
                email: "admin@naebak.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                is_staff: true,
                is_active: true,
                date_joined: Utc::now(),
            }],
            citizens: vec![],
            candidates: vec![],
            electoral_promises: vec![],
            service_history: vec![],
            messages: vec![],
            ratings: vec![],
            votes: vec![],
            news: vec![],
        };

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: BackupDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.accounts.len(), 1);
        assert_eq!(parsed.accounts[0].username, "admin");
        // no password material ever lands in a backup
        assert!(!json.contains("password"));
    }
}
