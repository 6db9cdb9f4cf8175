use std::fmt::{Debug, Display, Formatter};

use chrono::TimeDelta;

pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Human-readable duration like `2h 30min`, or `2h` for whole hours.
pub struct FormattedDuration(pub TimeDelta);

impl Display for FormattedDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        #[expect(clippy::cast_possible_truncation)]
        let minutes = (self.0.as_seconds_f64() / 60.0).round() as i64;
        let (hours, minutes) = (minutes.div_euclid(60), minutes.rem_euclid(60));
        if minutes > 0 { write!(f, "{hours}h {minutes}min") } else { write!(f, "{hours}h") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_duration() {
        assert_eq!(FormattedDuration(TimeDelta::hours(2)).to_string(), "2h");
        assert_eq!(FormattedDuration(TimeDelta::minutes(150)).to_string(), "2h 30min");
        assert_eq!(FormattedDuration(TimeDelta::minutes(30)).to_string(), "0h 30min");
    }

    #[test]
    fn test_formatted_percentage() {
        assert_eq!(FormattedPercentage(0.4567).to_string(), "45.7%");
    }
}
