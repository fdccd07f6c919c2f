//! Business calendar.
//!
//! Document periods and default payment dates follow the agency's local
//! calendar, not UTC.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use tourbook_core::numbering::Period;

/// Zone used when none is configured.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Asia::Bangkok;

/// Local calendar the repositories date documents in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    tz: Tz,
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_ZONE)
    }
}

impl BusinessClock {
    /// Creates a clock for `tz`.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a clock from an IANA zone name such as `Asia/Bangkok`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(Self::new)
    }

    /// Returns the configured zone.
    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Local date of an instant.
    #[must_use]
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.tz).date_naive()
    }

    /// Numbering period of an instant.
    #[must_use]
    pub fn period_of(&self, at: DateTime<Utc>) -> Period {
        Period::from_date(self.date_of(at))
    }

    /// Local date now.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// Numbering period now.
    #[must_use]
    pub fn current_period(&self) -> Period {
        self.period_of(Utc::now())
    }
}
