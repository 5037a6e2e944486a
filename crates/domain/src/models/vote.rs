//! Vote models and the per-pair vote state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A citizen's stance on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Approve,
    Disapprove,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Approve => "approve",
            VoteType::Disapprove => "disapprove",
        }
    }

    /// Arabic label as shown to voters.
    pub fn label_ar(&self) -> &'static str {
        match self {
            VoteType::Approve => "أؤيد",
            VoteType::Disapprove => "أعارض",
        }
    }
}

impl FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(VoteType::Approve),
            "disapprove" => Ok(VoteType::Disapprove),
            _ => Err(format!("Invalid vote type: {}", s)),
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored vote. At most one row exists per (candidate, citizen) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub candidate_id: i64,
    pub citizen_id: i64,
    pub vote_type: VoteType,
    pub timestamp: DateTime<Utc>,
}

/// What submitting a vote should do, given the pair's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No vote existed; store the submitted type.
    Cast(VoteType),
    /// A vote of the opposite type existed; overwrite it.
    Flip(VoteType),
    /// A vote of the same type existed; delete it (toggle off).
    Remove,
}

/// Resolves the state machine for one submission:
/// same type twice toggles off, the opposite type flips, and a fresh
/// submission casts.
pub fn vote_transition(current: Option<VoteType>, submitted: VoteType) -> VoteTransition {
    match current {
        None => VoteTransition::Cast(submitted),
        Some(existing) if existing == submitted => VoteTransition::Remove,
        Some(_) => VoteTransition::Flip(submitted),
    }
}

/// The applied result, used for the activity log and the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    Cast,
    Updated,
    Removed,
}

impl VoteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOutcome::Cast => "cast",
            VoteOutcome::Updated => "updated",
            VoteOutcome::Removed => "removed",
        }
    }
}

/// Vote submission payload. The type arrives as a raw string so invalid
/// values produce a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteInput {
    pub vote_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_type_round_trip() {
        assert_eq!(VoteType::from_str("approve").unwrap(), VoteType::Approve);
        assert_eq!(
            VoteType::from_str("disapprove").unwrap(),
            VoteType::Disapprove
        );
        assert!(VoteType::from_str("abstain").is_err());
        assert!(VoteType::from_str("Approve").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(VoteType::Approve.label_ar(), "أؤيد");
        assert_eq!(VoteType::Disapprove.label_ar(), "أعارض");
    }

    #[test]
    fn test_fresh_submission_casts() {
        assert_eq!(
            vote_transition(None, VoteType::Approve),
            VoteTransition::Cast(VoteType::Approve)
        );
        assert_eq!(
            vote_transition(None, VoteType::Disapprove),
            VoteTransition::Cast(VoteType::Disapprove)
        );
    }

    #[test]
    fn test_same_type_toggles_off() {
        assert_eq!(
            vote_transition(Some(VoteType::Approve), VoteType::Approve),
            VoteTransition::Remove
        );
        assert_eq!(
            vote_transition(Some(VoteType::Disapprove), VoteType::Disapprove),
            VoteTransition::Remove
        );
    }

    #[test]
    fn test_opposite_type_flips() {
        assert_eq!(
            vote_transition(Some(VoteType::Approve), VoteType::Disapprove),
            VoteTransition::Flip(VoteType::Disapprove)
        );
        assert_eq!(
            vote_transition(Some(VoteType::Disapprove), VoteType::Approve),
            VoteTransition::Flip(VoteType::Approve)
        );
    }

    #[test]
    fn test_toggle_off_then_recast_opposite() {
        // approve -> cast
        let t1 = vote_transition(None, VoteType::Approve);
        assert_eq!(t1, VoteTransition::Cast(VoteType::Approve));

        // approve again -> removed, pair back to no-vote
        let t2 = vote_transition(Some(VoteType::Approve), VoteType::Approve);
        assert_eq!(t2, VoteTransition::Remove);

        // disapprove -> cast fresh
        let t3 = vote_transition(None, VoteType::Disapprove);
        assert_eq!(t3, VoteTransition::Cast(VoteType::Disapprove));
    }
}
