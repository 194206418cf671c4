//! SM-2 Style Review Scheduler
//!
//! Pure mapping from `(MemoryState | absent, Grade, now)` to the next
//! `MemoryState`. The clock is always injected so every result is
//! reproducible.
//!
//! Interval policy:
//! - `again`: repetition count resets, the interval shrinks to the relearning
//!   step (never above the previous interval), ease takes a fixed penalty.
//! - first three passes: fixed learning steps of 1, 3 and 6 days.
//! - later passes: `previous × ease × grade_bonus`, rounded to whole days.
//!
//! There is no policy cap on intervals. Arithmetic saturates at the largest
//! representable `Duration`, and `due_at` saturates at the latest
//! representable timestamp.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AlgoError, Grade, MemoryState, AGAIN_EASE_PENALTY, DEFAULT_EASE, DEFAULT_RELEARN_MINUTES,
    LEARNING_STEPS_DAYS, MAX_INTERVAL_SECS, MIN_EASE, SECONDS_PER_DAY,
};

/// Tunable scheduler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerParams {
    /// Interval assigned after a failed recall (capped by the previous interval)
    #[serde(with = "crate::types::duration_secs")]
    pub relearn_interval: Duration,
    /// Ease a card starts with
    pub default_ease: f64,
    /// Ease floor
    pub min_ease: f64,
    /// Ease penalty on "again"
    pub again_penalty: f64,
    /// Fixed early intervals (days)
    pub learning_steps_days: [i64; 3],
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            relearn_interval: Duration::minutes(DEFAULT_RELEARN_MINUTES),
            default_ease: DEFAULT_EASE,
            min_ease: MIN_EASE,
            again_penalty: AGAIN_EASE_PENALTY,
            learning_steps_days: LEARNING_STEPS_DAYS,
        }
    }
}

impl SchedulerParams {
    /// Relearning step in minutes; negative or unrepresentable values are rejected
    pub fn with_relearn_minutes(mut self, minutes: i64) -> Result<Self, AlgoError> {
        self.relearn_interval = Duration::try_minutes(minutes)
            .filter(|interval| *interval >= Duration::zero())
            .ok_or_else(|| {
                AlgoError::InvalidParameter(format!("relearn step of {minutes} minutes"))
            })?;
        Ok(self)
    }
}

/// Whether a card is eligible for due-based selection.
///
/// Never-reviewed cards are always due.
pub fn is_due(state: Option<&MemoryState>, now: DateTime<Utc>) -> bool {
    match state {
        None => true,
        Some(state) => now >= state.due_at,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    params: SchedulerParams,
}

impl Scheduler {
    pub fn new(params: SchedulerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Baseline state for a card without history
    pub fn initial_state(&self) -> MemoryState {
        MemoryState {
            ease_factor: self.params.default_ease,
            ..MemoryState::unseen()
        }
    }

    /// Compute the state that follows a review graded `grade` at `now`
    pub fn update(
        &self,
        current: Option<&MemoryState>,
        grade: Grade,
        now: DateTime<Utc>,
    ) -> MemoryState {
        let previous = current.cloned().unwrap_or_else(|| self.initial_state());

        let (repetition_count, interval, ease_factor) = if grade.is_pass() {
            let interval = self.pass_interval(&previous, grade);
            let ease = (previous.ease_factor + grade.ease_delta()).max(self.params.min_ease);
            (previous.repetition_count.saturating_add(1), interval, ease)
        } else {
            let interval = self
                .params
                .relearn_interval
                .min(previous.interval)
                .max(Duration::zero());
            let ease = (previous.ease_factor - self.params.again_penalty).max(self.params.min_ease);
            (0, interval, ease)
        };

        MemoryState {
            repetition_count,
            interval,
            ease_factor,
            due_at: now
                .checked_add_signed(interval)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            last_reviewed_at: Some(now),
        }
    }

    /// Parse a raw grade and apply it
    pub fn review(
        &self,
        current: Option<&MemoryState>,
        outcome: &str,
        now: DateTime<Utc>,
    ) -> Result<MemoryState, AlgoError> {
        let grade: Grade = outcome.parse()?;
        Ok(self.update(current, grade, now))
    }

    /// Interval every grade would produce, for display next to the prompt
    pub fn preview_intervals(&self, current: Option<&MemoryState>) -> [(Grade, Duration); 4] {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        Grade::ALL.map(|grade| (grade, self.update(current, grade, now).interval))
    }

    fn pass_interval(&self, previous: &MemoryState, grade: Grade) -> Duration {
        let steps = &self.params.learning_steps_days;

        // Repetition counts 0, 1 and 2 use fixed steps instead of the multiplicative formula.
        if let Some(&step_days) = steps.get(previous.repetition_count as usize) {
            let days = if grade == Grade::Easy {
                ((step_days as f64) * grade.interval_bonus()).round() as i64
            } else {
                step_days
            };
            return interval_from_secs(days.max(step_days).saturating_mul(SECONDS_PER_DAY));
        }

        let previous_secs = previous.interval.num_seconds().max(0);
        let raw_secs = previous_secs as f64 * previous.ease_factor * grade.interval_bonus();
        let rounded_secs = ((raw_secs / SECONDS_PER_DAY as f64).round() as i64)
            .saturating_mul(SECONDS_PER_DAY);

        let floor_secs = match grade {
            Grade::Hard => previous_secs,
            _ => previous_secs.saturating_add(SECONDS_PER_DAY),
        };

        interval_from_secs(rounded_secs.max(floor_secs))
    }
}

fn interval_from_secs(secs: i64) -> Duration {
    Duration::seconds(secs.clamp(0, MAX_INTERVAL_SECS))
}
