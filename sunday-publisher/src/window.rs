use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};

pub const PUSH_WEEKDAY: Weekday = Weekday::Sun;
pub const PUSH_HOUR_UTC: u32 = 18;

/// A weekly one-hour publication window, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationWindow {
    pub weekday: Weekday,
    pub hour: u32,
}

impl Default for PublicationWindow {
    fn default() -> Self {
        Self {
            weekday: PUSH_WEEKDAY,
            hour: PUSH_HOUR_UTC,
        }
    }
}

impl PublicationWindow {
    /// True for every instant from `hour:00:00` through `hour:59:59` on the
    /// configured weekday.
    pub fn is_push_time(&self, now: DateTime<Utc>) -> bool {
        now.weekday() == self.weekday && now.hour() == self.hour
    }

    /// Start of the window containing `now`, if any. Used as the key of the
    /// publish marker.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.is_push_time(now) {
            return None;
        }
        Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), self.hour, 0, 0)
            .single()
    }
}

/// Sunday 18:00 UTC check.
pub fn is_push_time(now: DateTime<Utc>) -> bool {
    PublicationWindow::default().is_push_time(now)
}
