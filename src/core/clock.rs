use chrono::{DateTime, Local, NaiveDate};

/// Source of "now". Due-soon/overdue classification depends on it, so it is
/// injected rather than read ad hoc.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Local calendar date of `now()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Pinned clock for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::cell::Cell<DateTime<Local>>,
}

#[cfg(test)]
impl FixedClock {
    /// Clock pinned to `hour:00` local time on `date`.
    pub fn at(date: NaiveDate, hour: u32) -> Self {
        use chrono::TimeZone;
        let naive = date.and_hms_opt(hour, 0, 0).unwrap();
        let now = Local.from_local_datetime(&naive).earliest().unwrap();
        Self {
            now: std::cell::Cell::new(now),
        }
    }

    pub fn advance(&self, duration: chrono::Duration) {
        self.now.set(self.now.get() + duration);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today_ignores_time_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let clock = FixedClock::at(date, 23);
        assert_eq!(clock.today(), date);
        clock.advance(chrono::Duration::hours(2));
        assert_eq!(clock.today(), date.succ_opt().unwrap());
    }
}
