use std::fmt;

use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: u8 = 7;

const DAY_BITS: u32 = 3;
const DAY_MASK: u32 = (1 << DAY_BITS) - 1;

/// Compact calendar position encoding week and day-of-week in a single `u32`.
///
/// Bit layout: `[week:29][day:3]`. Weeks start at 1, days run 0..=6.
/// Natural `u32` ordering equals chronological ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "DateRepr", from = "DateRepr")]
pub struct GameDate(u32);

#[derive(Serialize, Deserialize)]
struct DateRepr {
    week: u32,
    day: u8,
}

impl From<GameDate> for DateRepr {
    fn from(date: GameDate) -> Self {
        DateRepr {
            week: date.week(),
            day: date.day(),
        }
    }
}

impl From<DateRepr> for GameDate {
    fn from(repr: DateRepr) -> Self {
        GameDate::new(repr.week, repr.day)
    }
}

impl GameDate {
    /// Create a date from week (1-based) and day-of-week (0..=6).
    pub fn new(week: u32, day: u8) -> Self {
        assert!(day < DAYS_PER_WEEK, "day out of range: {day}");
        assert!(week < (1 << (32 - DAY_BITS)), "week out of range: {week}");
        Self((week << DAY_BITS) | day as u32)
    }

    /// First day of the given week.
    pub fn week_start(week: u32) -> Self {
        Self::new(week, 0)
    }

    pub fn week(self) -> u32 {
        self.0 >> DAY_BITS
    }

    pub fn day(self) -> u8 {
        (self.0 & DAY_MASK) as u8
    }

    /// Days elapsed since week 0 day 0; used for arithmetic only.
    pub fn ordinal(self) -> u32 {
        self.week() * DAYS_PER_WEEK as u32 + self.day() as u32
    }

    fn from_ordinal(ordinal: u32) -> Self {
        let week = ordinal / DAYS_PER_WEEK as u32;
        let day = (ordinal % DAYS_PER_WEEK as u32) as u8;
        Self::new(week, day)
    }

    pub fn add_days(self, days: u32) -> Self {
        Self::from_ordinal(self.ordinal() + days)
    }

    pub fn next_day(self) -> Self {
        self.add_days(1)
    }

    /// Signed distance in days from `earlier` to `self`.
    pub fn days_since(self, earlier: GameDate) -> i64 {
        self.ordinal() as i64 - earlier.ordinal() as i64
    }

    /// Whole weeks elapsed since `earlier`, saturating at zero.
    pub fn weeks_since(self, earlier: GameDate) -> u32 {
        self.week().saturating_sub(earlier.week())
    }

    /// The raw packed representation (useful for RNG seeding).
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl Default for GameDate {
    fn default() -> Self {
        GameDate::week_start(1)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} day {}", self.week(), self.day() + 1)
    }
}
