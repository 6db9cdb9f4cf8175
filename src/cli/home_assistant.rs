use clap::Parser;
use reqwest::Url;

use crate::{api::home_assistant::Api, prelude::*};

#[derive(Parser)]
pub struct HomeAssistantArgs {
    #[clap(flatten)]
    pub connection: HomeAssistantConnectionArgs,

    /// Nord Pool sensor with `raw_today` and `raw_tomorrow` attributes.
    #[clap(
        long = "price-entity-id",
        default_value = "sensor.nordpool_fi",
        env = "PRICE_ENTITY_ID"
    )]
    pub price_entity_id: String,

    /// Entity to publish the planned periods to.
    #[clap(
        long = "output-entity-id",
        default_value = "sensor.nordpool_cutoff_periods",
        env = "OUTPUT_ENTITY_ID"
    )]
    pub output_entity_id: String,
}

#[derive(Parser)]
pub struct HomeAssistantConnectionArgs {
    /// Home Assistant API access token.
    #[clap(long = "home-assistant-access-token", env = "HOME_ASSISTANT_ACCESS_TOKEN")]
    pub access_token: String,

    /// Home Assistant API base URL. For example: `http://localhost:8123/api`.
    #[clap(long = "home-assistant-api-base-url", env = "HOME_ASSISTANT_API_BASE_URL")]
    pub base_url: Url,
}

impl HomeAssistantConnectionArgs {
    pub fn try_new_client(&self) -> Result<Api> {
        Api::try_new(&self.access_token, self.base_url.clone())
    }
}
