//! Electoral promises and public service history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item of a candidate's ordered promise list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralPromise {
    pub id: i64,
    pub candidate_id: i64,
    pub title: String,
    pub description: String,
    /// Display position; lists order by this, then creation time.
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding or editing a promise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromiseInput {
    pub title: String,
    pub description: String,
}

impl PromiseInput {
    pub fn validate_fields(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            Err("يرجى ملء جميع الحقول المطلوبة".to_string())
        } else {
            Ok(())
        }
    }
}

/// A past public-service position, listed newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicServiceHistory {
    pub id: i64,
    pub candidate_id: i64,
    pub start_year: i32,
    pub end_year: i32,
    pub position: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a service-history entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHistoryInput {
    pub start_year: i32,
    pub end_year: i32,
    pub position: String,
    pub description: String,
}

impl ServiceHistoryInput {
    pub fn validate_fields(&self) -> Result<(), String> {
        if self.position.trim().is_empty() {
            return Err("يرجى ملء جميع الحقول المطلوبة".to_string());
        }
        if self.start_year > self.end_year {
            return Err("سنة البداية يجب أن تسبق سنة النهاية".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promise_input_requires_fields() {
        let ok = PromiseInput {
            title: "تطوير المدارس".to_string(),
            description: "خطة لتجديد مدارس الدائرة".to_string(),
        };
        assert!(ok.validate_fields().is_ok());

        let missing = PromiseInput {
            title: "  ".to_string(),
            description: "وصف".to_string(),
        };
        assert!(missing.validate_fields().is_err());
    }

    #[test]
    fn test_service_history_year_order() {
        let ok = ServiceHistoryInput {
            start_year: 2015,
            end_year: 2020,
            position: "عضو مجلس محلي".to_string(),
            description: String::new(),
        };
        assert!(ok.validate_fields().is_ok());

        let reversed = ServiceHistoryInput {
            start_year: 2021,
            end_year: 2019,
            position: "عضو مجلس محلي".to_string(),
            description: String::new(),
        };
        assert!(reversed.validate_fields().is_err());
    }
}
