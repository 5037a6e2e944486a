//! Activity log models: the append-only audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Closed set of audited actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Login,
    Logout,
    Register,
    ProfileUpdate,
    MessageSent,
    MessageReply,
    RatingGiven,
    RatingUpdated,
    VoteCast,
    VoteUpdated,
    VoteRemoved,
    PromiseCreated,
    PromiseUpdated,
    PromiseDeleted,
    NewsCreated,
    NewsUpdated,
    NewsDeleted,
    NewsPublished,
    CandidateCreated,
    CandidateUpdated,
    CandidateDeleted,
    UserCreated,
    UserUpdated,
    UserDeleted,
    BackupCreated,
    BackupRestored,
    SystemError,
    SecurityAlert,
    ContactForm,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Login => "login",
            ActionType::Logout => "logout",
            ActionType::Register => "register",
            ActionType::ProfileUpdate => "profile_update",
            ActionType::MessageSent => "message_sent",
            ActionType::MessageReply => "message_reply",
            ActionType::RatingGiven => "rating_given",
            ActionType::RatingUpdated => "rating_updated",
            ActionType::VoteCast => "vote_cast",
            ActionType::VoteUpdated => "vote_updated",
            ActionType::VoteRemoved => "vote_removed",
            ActionType::PromiseCreated => "promise_created",
            ActionType::PromiseUpdated => "promise_updated",
            ActionType::PromiseDeleted => "promise_deleted",
            ActionType::NewsCreated => "news_created",
            ActionType::NewsUpdated => "news_updated",
            ActionType::NewsDeleted => "news_deleted",
            ActionType::NewsPublished => "news_published",
            ActionType::CandidateCreated => "candidate_created",
            ActionType::CandidateUpdated => "candidate_updated",
            ActionType::CandidateDeleted => "candidate_deleted",
            ActionType::UserCreated => "user_created",
            ActionType::UserUpdated => "user_updated",
            ActionType::UserDeleted => "user_deleted",
            ActionType::BackupCreated => "backup_created",
            ActionType::BackupRestored => "backup_restored",
            ActionType::SystemError => "system_error",
            ActionType::SecurityAlert => "security_alert",
            ActionType::ContactForm => "contact_form",
        }
    }

    pub fn label_ar(&self) -> &'static str {
        match self {
            ActionType::Login => "تسجيل دخول",
            ActionType::Logout => "تسجيل خروج",
            ActionType::Register => "تسجيل حساب جديد",
            ActionType::ProfileUpdate => "تحديث الملف الشخصي",
            ActionType::MessageSent => "إرسال رسالة",
            ActionType::MessageReply => "الرد على رسالة",
            ActionType::RatingGiven => "إعطاء تقييم",
            ActionType::RatingUpdated => "تحديث تقييم",
            ActionType::VoteCast => "إدلاء بصوت",
            ActionType::VoteUpdated => "تحديث تصويت",
            ActionType::VoteRemoved => "إلغاء تصويت",
            ActionType::PromiseCreated => "إنشاء وعد انتخابي",
            ActionType::PromiseUpdated => "تحديث وعد انتخابي",
            ActionType::PromiseDeleted => "حذف وعد انتخابي",
            ActionType::NewsCreated => "إنشاء خبر",
            ActionType::NewsUpdated => "تحديث خبر",
            ActionType::NewsDeleted => "حذف خبر",
            ActionType::NewsPublished => "نشر خبر",
            ActionType::CandidateCreated => "إنشاء حساب مرشح",
            ActionType::CandidateUpdated => "تحديث بيانات مرشح",
            ActionType::CandidateDeleted => "حذف حساب مرشح",
            ActionType::UserCreated => "إنشاء حساب مستخدم",
            ActionType::UserUpdated => "تحديث بيانات مستخدم",
            ActionType::UserDeleted => "حذف حساب مستخدم",
            ActionType::BackupCreated => "إنشاء نسخة احتياطية",
            ActionType::BackupRestored => "استعادة نسخة احتياطية",
            ActionType::SystemError => "خطأ في النظام",
            ActionType::SecurityAlert => "تنبيه أمني",
            ActionType::ContactForm => "رسالة اتصال",
        }
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(ActionType::Login),
            "logout" => Ok(ActionType::Logout),
            "register" => Ok(ActionType::Register),
            "profile_update" => Ok(ActionType::ProfileUpdate),
            "message_sent" => Ok(ActionType::MessageSent),
            "message_reply" => Ok(ActionType::MessageReply),
            "rating_given" => Ok(ActionType::RatingGiven),
            "rating_updated" => Ok(ActionType::RatingUpdated),
            "vote_cast" => Ok(ActionType::VoteCast),
            "vote_updated" => Ok(ActionType::VoteUpdated),
            "vote_removed" => Ok(ActionType::VoteRemoved),
            "promise_created" => Ok(ActionType::PromiseCreated),
            "promise_updated" => Ok(ActionType::PromiseUpdated),
            "promise_deleted" => Ok(ActionType::PromiseDeleted),
            "news_created" => Ok(ActionType::NewsCreated),
            "news_updated" => Ok(ActionType::NewsUpdated),
            "news_deleted" => Ok(ActionType::NewsDeleted),
            "news_published" => Ok(ActionType::NewsPublished),
            "candidate_created" => Ok(ActionType::CandidateCreated),
            "candidate_updated" => Ok(ActionType::CandidateUpdated),
            "candidate_deleted" => Ok(ActionType::CandidateDeleted),
            "user_created" => Ok(ActionType::UserCreated),
            "user_updated" => Ok(ActionType::UserUpdated),
            "user_deleted" => Ok(ActionType::UserDeleted),
            "backup_created" => Ok(ActionType::BackupCreated),
            "backup_restored" => Ok(ActionType::BackupRestored),
            "system_error" => Ok(ActionType::SystemError),
            "security_alert" => Ok(ActionType::SecurityAlert),
            "contact_form" => Ok(ActionType::ContactForm),
            _ => Err(format!("Unknown action type: {}", s)),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions surfaced by the security-alerts view.
pub const SECURITY_ACTIONS: [ActionType; 4] = [
    ActionType::Login,
    ActionType::Logout,
    ActionType::Register,
    ActionType::SecurityAlert,
];

/// Severity of a logged activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of entities an activity can reference. A tagged kind + id pair
/// replaces the reflective "any model" link of the original schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Citizen,
    Candidate,
    Promise,
    Message,
    Rating,
    Vote,
    News,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Account => "account",
            EntityKind::Citizen => "citizen",
            EntityKind::Candidate => "candidate",
            EntityKind::Promise => "promise",
            EntityKind::Message => "message",
            EntityKind::Rating => "rating",
            EntityKind::Vote => "vote",
            EntityKind::News => "news",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(EntityKind::Account),
            "citizen" => Ok(EntityKind::Citizen),
            "candidate" => Ok(EntityKind::Candidate),
            "promise" => Ok(EntityKind::Promise),
            "message" => Ok(EntityKind::Message),
            "rating" => Ok(EntityKind::Rating),
            "vote" => Ok(EntityKind::Vote),
            "news" => Ok(EntityKind::News),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weak reference to the entity an activity concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedObject {
    pub kind: EntityKind,
    pub id: i64,
}

/// One row of the audit trail. Never updated or deleted through normal
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    pub account_id: Option<i64>,
    pub action_type: ActionType,
    pub description: String,
    pub severity: Severity,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub related: Option<RelatedObject>,
    pub extra_data: JsonValue,
    pub timestamp: DateTime<Utc>,
}

/// Builder for a new activity entry.
#[derive(Debug, Clone)]
pub struct LogActivityInput {
    pub account_id: Option<i64>,
    pub action_type: ActionType,
    pub description: String,
    pub severity: Severity,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub related: Option<RelatedObject>,
    pub extra_data: JsonValue,
}

impl LogActivityInput {
    pub fn new(action_type: ActionType, description: impl Into<String>) -> Self {
        Self {
            account_id: None,
            action_type,
            description: description.into(),
            severity: Severity::Info,
            ip_address: None,
            user_agent: None,
            related: None,
            extra_data: JsonValue::Object(Default::default()),
        }
    }

    pub fn with_actor(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_related(mut self, kind: EntityKind, id: i64) -> Self {
        self.related = Some(RelatedObject { kind, id });
        self
    }

    pub fn with_extra(mut self, extra: JsonValue) -> Self {
        self.extra_data = extra;
        self
    }

    pub fn with_request_context(
        mut self,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

/// Filters for the admin activity-monitoring listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListQuery {
    pub action: Option<ActionType>,
    pub severity: Option<Severity>,
    pub account_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Severity counters over the trailing 24 hours.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_today: i64,
    pub critical_today: i64,
    pub errors_today: i64,
    pub warnings_today: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [ActionType; 29] = [
        ActionType::Login,
        ActionType::Logout,
        ActionType::Register,
        ActionType::ProfileUpdate,
        ActionType::MessageSent,
        ActionType::MessageReply,
        ActionType::RatingGiven,
        ActionType::RatingUpdated,
        ActionType::VoteCast,
        ActionType::VoteUpdated,
        ActionType::VoteRemoved,
        ActionType::PromiseCreated,
        ActionType::PromiseUpdated,
        ActionType::PromiseDeleted,
        ActionType::NewsCreated,
        ActionType::NewsUpdated,
        ActionType::NewsDeleted,
        ActionType::NewsPublished,
        ActionType::CandidateCreated,
        ActionType::CandidateUpdated,
        ActionType::CandidateDeleted,
        ActionType::UserCreated,
        ActionType::UserUpdated,
        ActionType::UserDeleted,
        ActionType::BackupCreated,
        ActionType::BackupRestored,
        ActionType::SystemError,
        ActionType::SecurityAlert,
        ActionType::ContactForm,
    ];

    #[test]
    fn test_action_type_round_trip() {
        for action in ALL_ACTIONS {
            assert_eq!(ActionType::from_str(action.as_str()).unwrap(), action);
        }
        assert!(ActionType::from_str("unknown_action").is_err());
    }

    #[test]
    fn test_severity_round_trip() {
        for severity in [
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ] {
            assert_eq!(Severity::from_str(severity.as_str()).unwrap(), severity);
        }
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_entity_kind_round_trip() {
        for kind in [
            EntityKind::Account,
            EntityKind::Citizen,
            EntityKind::Candidate,
            EntityKind::Promise,
            EntityKind::Message,
            EntityKind::Rating,
            EntityKind::Vote,
            EntityKind::News,
        ] {
            assert_eq!(EntityKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_log_input_builder() {
        let input = LogActivityInput::new(ActionType::VoteCast, "تصويت أؤيد للمرشح أحمد")
            .with_actor(7)
            .with_severity(Severity::Info)
            .with_related(EntityKind::Candidate, 3)
            .with_request_context(Some("10.0.0.1".to_string()), Some("Mozilla/5.0".to_string()));

        assert_eq!(input.account_id, Some(7));
        assert_eq!(input.action_type, ActionType::VoteCast);
        assert_eq!(
            input.related,
            Some(RelatedObject { kind: EntityKind::Candidate, id: 3 })
        );
        assert_eq!(input.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_default_severity_is_info() {
        let input = LogActivityInput::new(ActionType::Login, "تسجيل دخول");
        assert_eq!(input.severity, Severity::Info);
        assert!(input.account_id.is_none());
    }

    #[test]
    fn test_security_actions_set() {
        assert!(SECURITY_ACTIONS.contains(&ActionType::Login));
        assert!(SECURITY_ACTIONS.contains(&ActionType::SecurityAlert));
        assert!(!SECURITY_ACTIONS.contains(&ActionType::VoteCast));
    }
}
