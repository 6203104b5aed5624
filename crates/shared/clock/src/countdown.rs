//! Local auction countdown
//!
//! The chain only stores an end time; cards tick once a second against the
//! local clock. Wording follows the usual "distance to now" phrasing
//! (`"in 5 minutes"`, `"in about 3 hours"`), switching to `"Ended"` once the
//! end time has passed.

use bloom_core::UnixSeconds;

const MINUTES_IN_DAY: u64 = 1_440;
const MINUTES_IN_MONTH: u64 = 43_200;
const MINUTES_IN_TWO_MONTHS: u64 = 86_400;
const MINUTES_IN_YEAR: u64 = 525_600;

/// Label shown once an auction's end time has passed
pub const ENDED_LABEL: &str = "Ended";

/// Seconds from `now` until `end_time`, clamped at zero
pub fn remaining_secs(end_time: UnixSeconds, now: UnixSeconds) -> u64 {
    end_time.saturating_sub(now)
}

/// Countdown label for a card: `"Ended"` or `"in <distance>"`
pub fn time_left_label(end_time: UnixSeconds, now: UnixSeconds) -> String {
    if now >= end_time {
        return ENDED_LABEL.to_string();
    }
    format!("in {}", humanize_secs(end_time - now))
}

/// Approximate, human-friendly rendering of a span of seconds
pub fn humanize_secs(secs: u64) -> String {
    let minutes = (secs + 30) / 60;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        m if m < 45 => format!("{} minutes", m),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_IN_DAY => format!("about {} hours", (m + 30) / 60),
        m if m < 2_520 => "1 day".to_string(),
        m if m < MINUTES_IN_MONTH => format!("{} days", (m + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY),
        m if m < MINUTES_IN_TWO_MONTHS => {
            let months = (m + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
            if months <= 1 {
                "about 1 month".to_string()
            } else {
                format!("about {} months", months)
            }
        }
        m if m < MINUTES_IN_YEAR => {
            format!("{} months", (m + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH)
        }
        m => years_label(m / MINUTES_IN_MONTH),
    }
}

/// Whole months of a year or more: under 3 spare months is "about",
/// under 9 is "over", otherwise "almost" the next year
fn years_label(months: u64) -> String {
    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural_years(years)),
        3..=8 => format!("over {}", plural_years(years)),
        _ => format!("almost {}", plural_years(years + 1)),
    }
}

fn plural_years(years: u64) -> String {
    if years == 1 {
        "1 year".to_string()
    } else {
        format!("{} years", years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ended_once_now_reaches_end() {
        assert_eq!(time_left_label(100, 100), "Ended");
        assert_eq!(time_left_label(100, 250), "Ended");
        assert_eq!(remaining_secs(100, 250), 0);
    }

    #[test]
    fn test_short_spans() {
        assert_eq!(humanize_secs(10), "less than a minute");
        assert_eq!(humanize_secs(60), "1 minute");
        assert_eq!(humanize_secs(180), "3 minutes");
        assert_eq!(humanize_secs(510), "9 minutes");
    }

    #[test]
    fn test_hours_and_days() {
        assert_eq!(humanize_secs(3_600), "about 1 hour");
        assert_eq!(humanize_secs(6 * 3_600), "about 6 hours");
        assert_eq!(humanize_secs(86_400), "1 day");
        assert_eq!(humanize_secs(3 * 86_400), "3 days");
        assert_eq!(humanize_secs(7 * 86_400), "7 days");
    }

    #[test]
    fn test_long_spans() {
        assert_eq!(humanize_secs(35 * 86_400), "about 1 month");
        assert_eq!(humanize_secs(90 * 86_400), "3 months");
        assert_eq!(humanize_secs(400 * 86_400), "about 1 year");
    }

    #[test]
    fn test_year_remainders() {
        assert_eq!(humanize_secs(500 * 86_400), "over 1 year");
        assert_eq!(humanize_secs(700 * 86_400), "almost 2 years");
        assert_eq!(humanize_secs(800 * 86_400), "about 2 years");
        assert_eq!(humanize_secs(900 * 86_400), "over 2 years");
    }

    #[test]
    fn test_label_has_suffix() {
        assert_eq!(time_left_label(1_000 + 180, 1_000), "in 3 minutes");
    }
}
