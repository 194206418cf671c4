//! Common Types and Constants
//!
//! Shared data structures used by the scheduler and the selection policy.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Constants ====================

/// Ease factor assigned to a card on its first review
pub const DEFAULT_EASE: f64 = 2.5;

/// Ease factor floor
pub const MIN_EASE: f64 = 1.3;

/// Ease penalty applied on a failed recall
pub const AGAIN_EASE_PENALTY: f64 = 0.20;

/// Ease adjustment for a successful but effortful recall
pub const HARD_EASE_DELTA: f64 = -0.15;

/// Ease adjustment for a normal recall
pub const GOOD_EASE_DELTA: f64 = 0.0;

/// Ease adjustment for an effortless recall
pub const EASY_EASE_DELTA: f64 = 0.15;

/// Interval multiplier for "hard"
pub const HARD_BONUS: f64 = 0.8;

/// Interval multiplier for "good"
pub const GOOD_BONUS: f64 = 1.0;

/// Interval multiplier for "easy"
pub const EASY_BONUS: f64 = 1.3;

/// Fixed intervals (days) for the first three successful reviews, indexed by
/// the repetition count reached after the review minus one.
pub const LEARNING_STEPS_DAYS: [i64; 3] = [1, 3, 6];

/// Default relearning step after "again" (minutes)
pub const DEFAULT_RELEARN_MINUTES: i64 = 10;

/// Largest interval representable in whole seconds by `chrono::Duration`
pub const MAX_INTERVAL_SECS: i64 = i64::MAX / 1_000;

pub const SECONDS_PER_DAY: i64 = 86_400;

// ==================== Errors ====================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgoError {
    /// Grade input outside the recognised set
    #[error("invalid outcome '{0}': expected 1-4 or again/hard/good/easy")]
    InvalidOutcome(String),

    /// Scheduler parameter that cannot be represented
    #[error("invalid scheduler parameter: {0}")]
    InvalidParameter(String),
}

// ==================== Grade ====================

/// Self-rated recall quality, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    /// Whether the card was recalled at all
    pub fn is_pass(&self) -> bool {
        *self >= Grade::Hard
    }

    pub fn ease_delta(&self) -> f64 {
        match self {
            Grade::Again => -AGAIN_EASE_PENALTY,
            Grade::Hard => HARD_EASE_DELTA,
            Grade::Good => GOOD_EASE_DELTA,
            Grade::Easy => EASY_EASE_DELTA,
        }
    }

    pub fn interval_bonus(&self) -> f64 {
        match self {
            Grade::Again => 0.0,
            Grade::Hard => HARD_BONUS,
            Grade::Good => GOOD_BONUS,
            Grade::Easy => EASY_BONUS,
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = AlgoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            other => Err(AlgoError::InvalidOutcome(other.to_string())),
        }
    }
}

impl FromStr for Grade {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "1" | "again" => Ok(Grade::Again),
            "2" | "hard" => Ok(Grade::Hard),
            "3" | "good" | "medium" => Ok(Grade::Good),
            "4" | "easy" => Ok(Grade::Easy),
            _ => Err(AlgoError::InvalidOutcome(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Memory State ====================

/// Persisted scheduling belief about a single card.
///
/// Only [`crate::Scheduler::update`] produces new values of `interval` and
/// `due_at`; everything else reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Number of consecutive successful reviews
    pub repetition_count: u32,
    /// Time between the last review and the next due date
    #[serde(with = "duration_secs")]
    pub interval: Duration,
    /// Interval growth multiplier, never below [`MIN_EASE`]
    pub ease_factor: f64,
    pub due_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// State a never-reviewed card implicitly has: zero interval, default
    /// ease, due since the epoch.
    pub fn unseen() -> Self {
        Self {
            repetition_count: 0,
            interval: Duration::zero(),
            ease_factor: DEFAULT_EASE,
            due_at: DateTime::<Utc>::UNIX_EPOCH,
            last_reviewed_at: None,
        }
    }

    pub fn interval_days(&self) -> f64 {
        self.interval.num_seconds() as f64 / SECONDS_PER_DAY as f64
    }
}

/// Serde adapter storing a `chrono::Duration` as whole seconds
pub mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("interval of {secs}s out of range")))
    }
}
