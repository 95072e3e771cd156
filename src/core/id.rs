use chrono::{DateTime, Utc};

use crate::models::TaskId;

/// Produces task ids.
pub trait IdGenerator {
    fn next_id(&mut self, now: DateTime<Utc>) -> TaskId;
}

/// Millisecond-timestamp ids (`1736937005123`).
///
/// Calls landing in the same millisecond, or after the clock stepped back,
/// reuse the last timestamp with a `-N` suffix, so every id this generator
/// hands out is distinct.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last_millis: i64,
    seq: u32,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&mut self, now: DateTime<Utc>) -> TaskId {
        let millis = now.timestamp_millis();
        if millis > self.last_millis {
            self.last_millis = millis;
            self.seq = 0;
            millis.to_string()
        } else {
            self.seq += 1;
            format!("{}-{}", self.last_millis, self.seq)
        }
    }
}

/// `task-1`, `task-2`, ... for deterministic tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: u32,
}

#[cfg(test)]
impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, _now: DateTime<Utc>) -> TaskId {
        self.next += 1;
        format!("task-{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_rapid_calls_do_not_collide() {
        let mut ids = TimestampIdGenerator::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();

        let generated: Vec<_> = (0..50).map(|_| ids.next_id(now)).collect();
        let unique: HashSet<_> = generated.iter().collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(generated[0], now.timestamp_millis().to_string());
        assert_eq!(generated[1], format!("{}-1", now.timestamp_millis()));
    }

    #[test]
    fn test_clock_step_back_keeps_ids_unique() {
        let mut ids = TimestampIdGenerator::new();
        let later = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 1).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();

        let a = ids.next_id(later);
        let b = ids.next_id(earlier);
        assert_ne!(a, b);
        assert!(b.starts_with(&a));
    }

    #[test]
    fn test_new_millisecond_resets_suffix() {
        let mut ids = TimestampIdGenerator::new();
        let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        ids.next_id(t0);
        ids.next_id(t0);
        let t1 = t0 + chrono::Duration::milliseconds(1);
        assert_eq!(ids.next_id(t1), t1.timestamp_millis().to_string());
    }
}
