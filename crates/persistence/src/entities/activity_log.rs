//! Activity log entity.

use chrono::{DateTime, Utc};
use domain::models::{ActionType, ActivityLog, EntityKind, RelatedObject, Severity};
use sqlx::FromRow;
use std::str::FromStr;

/// Database entity for activity log rows.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogEntity {
    pub id: i64,
    pub account_id: Option<i64>,
    pub action_type: String,
    pub description: String,
    pub severity: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub related_kind: Option<String>,
    pub related_id: Option<i64>,
    pub extra_data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl From<ActivityLogEntity> for ActivityLog {
    fn from(e: ActivityLogEntity) -> Self {
        let related = match (e.related_kind.as_deref(), e.related_id) {
            (Some(kind), Some(id)) => EntityKind::from_str(kind)
                .ok()
                .map(|kind| RelatedObject { kind, id }),
            _ => None,
        };

        ActivityLog {
            id: e.id,
            account_id: e.account_id,
            action_type: ActionType::from_str(&e.action_type)
                .unwrap_or(ActionType::SystemError),
            description: e.description,
            severity: Severity::from_str(&e.severity).unwrap_or_default(),
            ip_address: e.ip_address,
            user_agent: e.user_agent,
            related,
            extra_data: e.extra_data,
            timestamp: e.timestamp,
        }
    }
}
