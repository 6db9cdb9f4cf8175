use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    api::{DailyPrices, PriceSource},
    prelude::*,
};

/// JSON file with the same shape as the price sensor attributes.
pub struct PriceFile(PathBuf);

impl PriceFile {
    pub const fn new(path: PathBuf) -> Self {
        Self(path)
    }
}

#[async_trait]
impl PriceSource for PriceFile {
    #[instrument(skip_all, fields(path = %self.0.display()))]
    async fn get_prices(&self) -> Result<DailyPrices> {
        let contents = std::fs::read_to_string(&self.0)
            .with_context(|| format!("failed to read `{}`", self.0.display()))?;
        let prices: DailyPrices = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse `{}`", self.0.display()))?;
        info!(n_today = prices.raw_today.len(), n_tomorrow = prices.raw_tomorrow.len(), "loaded");
        Ok(prices)
    }
}
