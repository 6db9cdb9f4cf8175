pub mod cost;
pub mod rate;

use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

/// Dimensioned scalar: the const parameters are the exponents of power, time and cost.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[serde(transparent)]
pub struct Quantity<const POWER: isize, const TIME: isize, const COST: isize>(pub f64);

impl<const POWER: isize, const TIME: isize, const COST: isize> Quantity<POWER, TIME, COST> {
    pub const ZERO: Self = Self(0.0);

    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        if rhs < self { rhs } else { self }
    }

    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        if rhs > self { rhs } else { self }
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> PartialEq
    for Quantity<POWER, TIME, COST>
{
    fn eq(&self, other: &Self) -> bool {
        ordered_float::OrderedFloat(self.0).eq(&ordered_float::OrderedFloat(other.0))
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Eq for Quantity<POWER, TIME, COST> {}

impl<const POWER: isize, const TIME: isize, const COST: isize> PartialOrd
    for Quantity<POWER, TIME, COST>
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Ord for Quantity<POWER, TIME, COST> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        ordered_float::OrderedFloat(self.0).cmp(&ordered_float::OrderedFloat(other.0))
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Mul<f64>
    for Quantity<POWER, TIME, COST>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Div<f64>
    for Quantity<POWER, TIME, COST>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}
