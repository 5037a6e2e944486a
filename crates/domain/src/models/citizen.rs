//! Citizen profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::governorates;

/// A registered citizen, one-to-one with an [`super::Account`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Citizen {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn governorate_name(&self) -> &'static str {
        governorates::name_ar(self.governorate_id)
    }
}

/// Self-registration payload. Field-level checks are declarative; the
/// cross-field rules (password confirmation, governorate id, phone format)
/// live in [`RegisterCitizenInput::validate_registration`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCitizenInput {
    #[validate(length(min = 1, max = 100, message = "يرجى ملء جميع الحقول المطلوبة"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "يرجى ملء جميع الحقول المطلوبة"))]
    pub last_name: String,
    #[validate(email(message = "البريد الإلكتروني غير صحيح"))]
    pub email: String,
    #[validate(length(min = 1, message = "يرجى ملء جميع الحقول المطلوبة"))]
    pub phone: String,
    pub governorate_id: i32,
    #[validate(length(min = 1, message = "يرجى ملء جميع الحقول المطلوبة"))]
    pub area_type: String,
    #[validate(length(min = 1, message = "يرجى ملء جميع الحقول المطلوبة"))]
    pub area_name: String,
    #[validate(length(min = 1, message = "يرجى ملء جميع الحقول المطلوبة"))]
    pub address: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterCitizenInput {
    /// Cross-field validation. Returns the Arabic message for the first
    /// failed rule, matching the one-error-at-a-time form behavior.
    pub fn validate_registration(&self) -> Result<(), String> {
        if self.password != self.password_confirm {
            return Err("كلمات المرور غير متطابقة".to_string());
        }
        if let Err(e) = shared::validation::validate_password(&self.password) {
            return Err(e.message.map_or_else(
                || "كلمة المرور غير صالحة".to_string(),
                |m| m.to_string(),
            ));
        }
        if let Err(e) = shared::validation::validate_egyptian_phone(&self.phone) {
            return Err(e.message.map_or_else(
                || "رقم الهاتف غير صحيح".to_string(),
                |m| m.to_string(),
            ));
        }
        if !governorates::is_valid_id(self.governorate_id) {
            return Err("المحافظة المطلوبة غير موجودة".to_string());
        }
        Ok(())
    }
}

/// Quick-login payload from the landing page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLoginInput {
    pub governorate_id: i32,
    pub citizen_name: String,
    pub phone_number: String,
}

/// Profile update payload; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCitizenInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub governorate_id: Option<i32>,
    pub area_type: Option<String>,
    pub area_name: Option<String>,
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RegisterCitizenInput {
        RegisterCitizenInput {
            first_name: "منى".to_string(),
            last_name: "سعيد".to_string(),
            email: "mona@example.com".to_string(),
            phone: "01012345678".to_string(),
            governorate_id: 1,
            area_type: "حضر".to_string(),
            area_name: "مدينة نصر".to_string(),
            address: "شارع الطيران".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(input().validate_registration().is_ok());
    }

    #[test]
    fn test_mismatched_passwords_rejected() {
        let mut reg = input();
        reg.password_confirm = "different".to_string();
        assert_eq!(
            reg.validate_registration().unwrap_err(),
            "كلمات المرور غير متطابقة"
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let mut reg = input();
        reg.password = "abc".to_string();
        reg.password_confirm = "abc".to_string();
        assert!(reg.validate_registration().is_err());
    }

    #[test]
    fn test_unknown_governorate_rejected() {
        let mut reg = input();
        reg.governorate_id = 99;
        assert_eq!(
            reg.validate_registration().unwrap_err(),
            "المحافظة المطلوبة غير موجودة"
        );
    }

    #[test]
    fn test_bad_phone_rejected() {
        let mut reg = input();
        reg.phone = "12345".to_string();
        assert!(reg.validate_registration().is_err());
    }

    #[test]
    fn test_registration_accepts_generated_emails() {
        use fake::{faker::internet::en::SafeEmail, Fake};

        for _ in 0..5 {
            let mut reg = input();
            reg.email = SafeEmail().fake();
            assert!(reg.validate_registration().is_ok());
        }
    }

    #[test]
    fn test_citizen_governorate_name() {
        let citizen = Citizen {
            id: 1,
            account_id: 1,
            first_name: "منى".to_string(),
            last_name: "سعيد".to_string(),
            email: "mona@example.com".to_string(),
            phone_number: "01012345678".to_string(),
            governorate_id: 4,
            area_type: "حضر".to_string(),
            area_name: "سموحة".to_string(),
            address: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(citizen.governorate_name(), "الإسكندرية");
        assert_eq!(citizen.full_name(), "منى سعيد");
    }
}
