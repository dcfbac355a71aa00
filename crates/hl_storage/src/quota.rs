use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Rewrite calls made on `reset_on` (a UTC calendar day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    pub used: u32,
    pub reset_on: NaiveDate,
}

impl QuotaState {
    pub fn new(today: NaiveDate) -> Self {
        Self { used: 0, reset_on: today }
    }

    /// Zeroes the counter the first time a later day is observed.
    /// Returns whether a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today > self.reset_on {
            self.used = 0;
            self.reset_on = today;
            true
        } else {
            false
        }
    }

    pub fn exceeded(&mut self, now: DateTime<Utc>, limit: u32) -> bool {
        self.roll_over(now.date_naive());
        self.used >= limit
    }

    pub fn try_consume(&mut self, now: DateTime<Utc>, limit: u32) -> bool {
        if self.exceeded(now, limit) {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn remaining(&self, limit: u32) -> u32 {
        limit.saturating_sub(self.used)
    }
}
