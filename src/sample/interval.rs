use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use std::time::Duration;

use crate::error::{GenError, Result};

/// The global `[start, end)` bound of a benchmark run.
///
/// Both bounds and the span between them fit in i64 nanoseconds since the
/// Unix epoch, so every window drawn from it has an exact nanosecond form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    start_nanos: i64,
    span_nanos: i64,
}

/// A sampled sub-interval of a [`TimeInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    start_nanos: i64,
    end_nanos: i64,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(GenError::InvalidInterval {
                start: format_instant(start),
                end: format_instant(end),
            });
        }

        let out_of_range = || GenError::IntervalOutOfRange {
            start: format_instant(start),
            end: format_instant(end),
        };
        let start_nanos = start.timestamp_nanos_opt().ok_or_else(out_of_range)?;
        let end_nanos = end.timestamp_nanos_opt().ok_or_else(out_of_range)?;
        let span_nanos = end_nanos
            .checked_sub(start_nanos)
            .ok_or_else(out_of_range)?;

        Ok(TimeInterval {
            start,
            end,
            start_nanos,
            span_nanos,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Draw a window of exactly `duration` that lies fully inside the interval.
    ///
    /// The offset from `start` is uniform over `[0, span - duration]` in whole
    /// nanoseconds. A duration longer than the interval is an error, never clamped.
    pub fn random_window<R: Rng>(&self, rng: &mut R, duration: Duration) -> Result<Window> {
        let requested = duration.as_nanos();
        let nanos = i64::try_from(requested)
            .ok()
            .filter(|n| *n <= self.span_nanos)
            .ok_or(GenError::InvalidDuration {
                requested_nanos: requested,
                available_nanos: self.span_nanos,
            })?;

        let offset = rng.gen_range(0..=self.span_nanos - nanos);
        let start = self.start + chrono::Duration::nanoseconds(offset);
        // offset + nanos <= span, so neither bound can leave the i64 range
        let start_nanos = self.start_nanos + offset;

        Ok(Window {
            start,
            end: start + chrono::Duration::nanoseconds(nanos),
            start_nanos,
            end_nanos: start_nanos + nanos,
        })
    }
}

impl Window {
    pub fn duration(&self) -> Duration {
        Duration::from_nanos((self.end_nanos - self.start_nanos) as u64)
    }

    pub fn start_string(&self) -> String {
        format_instant(self.start)
    }

    pub fn end_string(&self) -> String {
        format_instant(self.end)
    }

    /// Nanoseconds since the Unix epoch.
    pub fn start_nanos(&self) -> i64 {
        self.start_nanos
    }

    pub fn end_nanos(&self) -> i64 {
        self.end_nanos
    }
}

fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_full_span_window_is_the_interval() {
        let start = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2016, 1, 2, 0, 0, 0).unwrap();
        let interval = TimeInterval::new(start, end).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let window = interval
            .random_window(&mut rng, Duration::from_secs(24 * 3600))
            .unwrap();

        assert_eq!(window.start, start);
        assert_eq!(window.end, end);
        assert_eq!(window.start_nanos(), 1_451_606_400_000_000_000);
        assert_eq!(window.end_nanos(), 1_451_692_800_000_000_000);
    }

    #[test]
    fn test_format_drops_zero_fraction() {
        let t = Utc.with_ymd_and_hms(2016, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_instant(t), "2016-01-01T12:00:00Z");
    }
}
