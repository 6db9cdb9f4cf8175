pub mod home_assistant;
mod price_file;

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::serde_as;

pub use self::price_file::PriceFile;
use crate::{core::slot::RawSlot, prelude::*};

/// Price records of the current and, if already published, the next day.
#[must_use]
#[serde_as]
#[derive(Default, Deserialize)]
pub struct DailyPrices {
    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::VecSkipError<_>>")]
    #[serde(default)]
    pub raw_today: Vec<RawSlot>,

    #[serde_as(as = "serde_with::DefaultOnNull<serde_with::VecSkipError<_>>")]
    #[serde(default)]
    pub raw_tomorrow: Vec<RawSlot>,
}

#[async_trait]
pub trait PriceSource: Sync {
    async fn get_prices(&self) -> Result<DailyPrices>;
}
