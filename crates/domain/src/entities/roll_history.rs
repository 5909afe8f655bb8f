//! Roll history - Recent rolls and luck statistics for one roller
//!
//! Only the most recent rolls are kept, but the running totals and streaks
//! cover every roll ever recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::ids::{RollHistoryId, RollId};
use crate::value_objects::RollResult;

/// Default number of recent rolls retained
pub const MAX_RECENT_ROLLS: usize = 20;

/// One recorded roll
///
/// Plain data: every combination of values is valid, so fields are public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRecord {
    pub id: RollId,
    pub notation: String,
    /// What the roll was for, e.g. "lockpicking"
    pub context: Option<String>,
    pub raw_rolls: Vec<u32>,
    pub net_successes: u32,
    pub is_fumble: bool,
    pub is_critical: bool,
    pub rolled_at: DateTime<Utc>,
}

impl RollRecord {
    pub fn from_roll(roll: &RollResult, context: Option<String>, rolled_at: DateTime<Utc>) -> Self {
        Self {
            id: RollId::new(),
            notation: roll.pool().to_string(),
            context,
            raw_rolls: roll.raw_rolls(),
            net_successes: roll.net_successes(),
            is_fumble: roll.is_fumble(),
            is_critical: roll.is_critical_success(),
            rolled_at,
        }
    }

    /// A roll with at least one net success counts toward a lucky streak
    pub fn is_lucky(&self) -> bool {
        self.net_successes > 0
    }
}

/// Bounded roll log with running statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollHistory {
    id: RollHistoryId,
    max_recent: usize,
    recent: VecDeque<RollRecord>,
    total_rolls: u64,
    total_fumbles: u64,
    total_criticals: u64,
    net_success_sum: u64,
    /// Positive: consecutive lucky rolls. Negative: consecutive unlucky rolls.
    current_streak: i64,
    longest_lucky_streak: u64,
    longest_unlucky_streak: u64,
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(MAX_RECENT_ROLLS)
    }
}

impl RollHistory {
    /// Create an empty history keeping at most `max_recent` rolls (at least 1)
    pub fn new(max_recent: usize) -> Self {
        let max_recent = max_recent.max(1);
        Self {
            id: RollHistoryId::new(),
            max_recent,
            recent: VecDeque::with_capacity(max_recent),
            total_rolls: 0,
            total_fumbles: 0,
            total_criticals: 0,
            net_success_sum: 0,
            current_streak: 0,
            longest_lucky_streak: 0,
            longest_unlucky_streak: 0,
        }
    }

    pub fn record(&mut self, record: RollRecord) {
        self.total_rolls += 1;
        self.net_success_sum += u64::from(record.net_successes);
        if record.is_fumble {
            self.total_fumbles += 1;
        }
        if record.is_critical {
            self.total_criticals += 1;
        }
        self.update_streak(record.is_lucky());

        self.recent.push_back(record);
        while self.recent.len() > self.max_recent {
            self.recent.pop_front();
        }
    }

    fn update_streak(&mut self, lucky: bool) {
        if lucky {
            self.current_streak = if self.current_streak >= 0 {
                self.current_streak + 1
            } else {
                1
            };
            self.longest_lucky_streak = self
                .longest_lucky_streak
                .max(self.current_streak.unsigned_abs());
        } else {
            self.current_streak = if self.current_streak <= 0 {
                self.current_streak - 1
            } else {
                -1
            };
            self.longest_unlucky_streak = self
                .longest_unlucky_streak
                .max(self.current_streak.unsigned_abs());
        }
    }

    pub fn id(&self) -> RollHistoryId {
        self.id
    }

    pub fn max_recent(&self) -> usize {
        self.max_recent
    }

    /// Recent rolls, oldest first
    pub fn recent_rolls(&self) -> impl Iterator<Item = &RollRecord> {
        self.recent.iter()
    }

    pub fn last_roll(&self) -> Option<&RollRecord> {
        self.recent.back()
    }

    pub fn total_rolls(&self) -> u64 {
        self.total_rolls
    }

    pub fn total_fumbles(&self) -> u64 {
        self.total_fumbles
    }

    pub fn total_criticals(&self) -> u64 {
        self.total_criticals
    }

    pub fn current_streak(&self) -> i64 {
        self.current_streak
    }

    pub fn longest_lucky_streak(&self) -> u64 {
        self.longest_lucky_streak
    }

    pub fn longest_unlucky_streak(&self) -> u64 {
        self.longest_unlucky_streak
    }

    /// Mean net successes over every recorded roll, 0 when empty
    pub fn average_net_successes(&self) -> f64 {
        Self::ratio(self.net_success_sum, self.total_rolls)
    }

    pub fn fumble_rate(&self) -> f64 {
        Self::ratio(self.total_fumbles, self.total_rolls)
    }

    pub fn critical_rate(&self) -> f64 {
        Self::ratio(self.total_criticals, self.total_rolls)
    }

    fn ratio(part: u64, whole: u64) -> f64 {
        if whole == 0 {
            0.0
        } else {
            part as f64 / whole as f64
        }
    }
}
