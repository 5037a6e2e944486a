//! Domain validation helpers.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    // Egyptian mobile numbers: optional country code, then 010/011/012/015
    // followed by eight digits.
    static ref EGYPT_MOBILE: Regex = Regex::new(r"^(\+20|0020|20)?1[0125]\d{8}$").unwrap();
    // Landlines: area code then seven or eight digits.
    static ref EGYPT_LANDLINE: Regex = Regex::new(r"^(\+20|0020|20)?[2-9]\d{7,8}$").unwrap();
    static ref NON_PHONE_CHARS: Regex = Regex::new(r"[^\d+]").unwrap();
}

/// Validates that a star rating is within the 1-5 range.
pub fn validate_stars(stars: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&stars) {
        Ok(())
    } else {
        let mut err = ValidationError::new("stars_range");
        err.message = Some("تقييم النجوم يجب أن يكون بين 1 و 5".into());
        Err(err)
    }
}

/// Validates a registration password.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_length");
        err.message = Some("كلمة المرور يجب أن تكون 6 أحرف على الأقل".into());
        Err(err)
    }
}

/// Validates an Egyptian phone number (mobile or landline), ignoring
/// spacing and punctuation.
pub fn validate_egyptian_phone(phone: &str) -> Result<(), ValidationError> {
    let normalized = NON_PHONE_CHARS.replace_all(phone, "");

    if !normalized.is_empty()
        && (EGYPT_MOBILE.is_match(&normalized) || EGYPT_LANDLINE.is_match(&normalized))
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("رقم الهاتف غير صحيح".into());
        Err(err)
    }
}

/// Normalizes an Egyptian phone number to the local `01xxxxxxxxx` format,
/// stripping any country code prefix.
pub fn format_egyptian_phone(phone: &str) -> String {
    let mut normalized = NON_PHONE_CHARS.replace_all(phone, "").into_owned();

    for prefix in ["+20", "0020", "20"] {
        if let Some(rest) = normalized.strip_prefix(prefix) {
            normalized = rest.to_string();
            break;
        }
    }

    if normalized.len() == 10 && normalized.starts_with('1') {
        normalized.insert(0, '0');
    }

    normalized
}

/// Validates that a string field is non-empty after trimming.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("يرجى ملء جميع الحقول المطلوبة".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stars_bounds() {
        assert!(validate_stars(1).is_ok());
        assert!(validate_stars(3).is_ok());
        assert!(validate_stars(5).is_ok());
        assert!(validate_stars(0).is_err());
        assert!(validate_stars(6).is_err());
        assert!(validate_stars(-1).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("abcdef").is_ok());
        assert!(validate_password("abcde").is_err());
        assert!(validate_password("").is_err());
        // Counted in characters, not bytes
        assert!(validate_password("كلمةسر").is_ok());
    }

    #[test]
    fn test_validate_egyptian_mobile() {
        assert!(validate_egyptian_phone("01012345678").is_ok());
        assert!(validate_egyptian_phone("01512345678").is_ok());
        assert!(validate_egyptian_phone("+201012345678").is_ok());
        assert!(validate_egyptian_phone("010 1234 5678").is_ok());
    }

    #[test]
    fn test_validate_egyptian_landline() {
        assert!(validate_egyptian_phone("0223456789").is_err()); // leading zero not in pattern
        assert!(validate_egyptian_phone("223456789").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_garbage() {
        assert!(validate_egyptian_phone("").is_err());
        assert!(validate_egyptian_phone("abc").is_err());
        assert!(validate_egyptian_phone("0191234").is_err());
    }

    #[test]
    fn test_format_egyptian_phone_strips_country_code() {
        assert_eq!(format_egyptian_phone("+201012345678"), "01012345678");
        assert_eq!(format_egyptian_phone("00201012345678"), "01012345678");
        assert_eq!(format_egyptian_phone("201012345678"), "01012345678");
        assert_eq!(format_egyptian_phone("01012345678"), "01012345678");
    }

    #[test]
    fn test_format_egyptian_phone_adds_leading_zero() {
        assert_eq!(format_egyptian_phone("1012345678"), "01012345678");
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("قيمة").is_ok());
        assert!(validate_required("").is_err());
        assert!(validate_required("   ").is_err());
    }
}
