//! Rating and rating-reply models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A citizen's 1-5 star score on a candidate. At most one row exists per
/// (candidate, citizen) pair; later submissions overwrite it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    pub candidate_id: i64,
    pub citizen_id: i64,
    pub stars: i32,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

/// A candidate's single reply to a rating; writing a new one replaces
/// any previous reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReply {
    pub id: i64,
    pub rating_id: i64,
    pub candidate_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Rating submission payload. Stars arrive as a raw value and are bounds-
/// checked before any storage is touched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCandidateInput {
    pub stars: serde_json::Value,
    #[serde(default)]
    pub comment: String,
}

impl RateCandidateInput {
    /// Parses and bounds-checks the stars value. Non-integer and
    /// out-of-range submissions are rejected with the Arabic form message.
    pub fn parse_stars(&self) -> Result<i32, String> {
        let stars = match &self.stars {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        match stars {
            Some(s) if (1..=5).contains(&s) => Ok(s as i32),
            _ => Err("تقييم النجوم يجب أن يكون بين 1 و 5".to_string()),
        }
    }
}

/// Whether a submission created or overwrote the pair's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingOutcome {
    Created,
    Updated,
}

/// Counts of ratings per star value, index 0 holding one-star counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution(pub [i64; 5]);

impl RatingDistribution {
    pub fn count_for(&self, stars: i32) -> i64 {
        if (1..=5).contains(&stars) {
            self.0[(stars - 1) as usize]
        } else {
            0
        }
    }

    pub fn record(&mut self, stars: i32, count: i64) {
        if (1..=5).contains(&stars) {
            self.0[(stars - 1) as usize] = count;
        }
    }

    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }
}

/// Reply submission payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReplyInput {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(stars: serde_json::Value) -> RateCandidateInput {
        RateCandidateInput {
            stars,
            comment: String::new(),
        }
    }

    #[test]
    fn test_parse_stars_in_range() {
        for s in 1..=5 {
            assert_eq!(input(json!(s)).parse_stars().unwrap(), s);
        }
    }

    #[test]
    fn test_parse_stars_out_of_range() {
        assert!(input(json!(0)).parse_stars().is_err());
        assert!(input(json!(6)).parse_stars().is_err());
        assert!(input(json!(-3)).parse_stars().is_err());
    }

    #[test]
    fn test_parse_stars_from_form_string() {
        assert_eq!(input(json!("4")).parse_stars().unwrap(), 4);
        assert_eq!(input(json!(" 2 ")).parse_stars().unwrap(), 2);
    }

    #[test]
    fn test_parse_stars_non_numeric() {
        assert!(input(json!("خمسة")).parse_stars().is_err());
        assert!(input(json!(null)).parse_stars().is_err());
        assert!(input(json!(3.5)).parse_stars().is_err());
        assert!(input(json!([5])).parse_stars().is_err());
    }

    #[test]
    fn test_distribution() {
        let mut dist = RatingDistribution::default();
        dist.record(5, 7);
        dist.record(1, 2);
        assert_eq!(dist.count_for(5), 7);
        assert_eq!(dist.count_for(1), 2);
        assert_eq!(dist.count_for(3), 0);
        assert_eq!(dist.total(), 9);
        // out-of-range lookups are harmless
        assert_eq!(dist.count_for(0), 0);
        assert_eq!(dist.count_for(6), 0);
    }
}
