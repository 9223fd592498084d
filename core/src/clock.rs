//! Generation clock: owns "now" and the JST rendering of dates.
//!
//! RULE: Formatters never read the system time directly.
//! Every date written to a file goes through `to_jst`.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn today_jst(&self) -> NaiveDate {
        to_jst(self.now_utc()).date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant. Used in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.at
    }
}

pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn to_jst(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    at.with_timezone(&jst())
}

/// `YYYYMMDD` in JST.
pub fn jst_yyyymmdd(at: DateTime<Utc>) -> String {
    to_jst(at).format("%Y%m%d").to_string()
}

/// `MMDD` in JST.
pub fn jst_mmdd(at: DateTime<Utc>) -> String {
    to_jst(at).format("%m%d").to_string()
}
