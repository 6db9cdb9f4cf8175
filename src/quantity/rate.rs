use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use chrono::TimeDelta;

use crate::quantity::{Quantity, cost::Cost};

/// Price per kilowatt-hour, in whatever currency unit the price source publishes.
pub type KilowattHourRate = Quantity<-1, -1, 1>;

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/kWh", self.0)
    }
}

impl Mul<TimeDelta> for KilowattHourRate {
    type Output = Cost;

    fn mul(self, rhs: TimeDelta) -> Self::Output {
        let hours = rhs.as_seconds_f64() / 3600.0;
        Quantity(self.0 * hours)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_mul_time_delta() {
        let cost = KilowattHourRate::from(12.0) * TimeDelta::minutes(15);
        assert_abs_diff_eq!(cost.0, 3.0);
    }
}
