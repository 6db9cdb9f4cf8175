use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use chrono::TimeDelta;

use crate::quantity::{Quantity, rate::KilowattHourRate};

/// Cost of running a nominal one-kilowatt load, in the price currency.
pub type Cost = Quantity<0, 0, 1>;

impl Cost {
    /// Round the cost to [mills][1].
    ///
    /// [1]: https://en.wikipedia.org/wiki/Mill_(currency)
    #[must_use]
    pub fn round_to_mills(self) -> Self {
        Self((self.0 * 1000.0).round() / 1000.0)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Average rate over the duration.
impl Div<TimeDelta> for Cost {
    type Output = KilowattHourRate;

    fn div(self, rhs: TimeDelta) -> Self::Output {
        let hours = rhs.as_seconds_f64() / 3600.0;
        Quantity(self.0 / hours)
    }
}
