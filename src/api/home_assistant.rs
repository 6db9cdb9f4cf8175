use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    ClientBuilder,
    StatusCode,
    Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    api::{DailyPrices, PriceSource},
    prelude::*,
};

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn try_new(access_token: &str, base_url: Url) -> Result<Self> {
        let headers = HeaderMap::from_iter([(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {access_token}"))?,
        )]);
        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Fetch the entity state, or [`None`] if Home Assistant does not know the entity.
    #[instrument(skip_all, fields(entity_id = entity_id))]
    pub async fn get_state<A: DeserializeOwned>(
        &self,
        entity_id: &str,
    ) -> Result<Option<EntityState<A>>> {
        let response = self.client.get(self.state_url(entity_id)?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!("entity not found");
            return Ok(None);
        }
        let state: EntityState<A> = response.error_for_status()?.json().await?;
        info!(state = %state.state, "fetched");
        Ok(Some(state))
    }

    /// Create or overwrite the entity state.
    #[instrument(skip_all, fields(entity_id = entity_id, state = %update.state))]
    pub async fn set_state<A: Serialize + Sync>(
        &self,
        entity_id: &str,
        update: &StateUpdate<A>,
    ) -> Result {
        self.client
            .post(self.state_url(entity_id)?)
            .json(update)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("failed to publish `{entity_id}`"))?;
        info!("published");
        Ok(())
    }

    fn state_url(&self, entity_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .push("states")
            .push(entity_id);
        Ok(url)
    }
}

#[must_use]
#[derive(Deserialize)]
pub struct EntityState<A> {
    pub state: String,
    pub attributes: A,
}

#[must_use]
#[derive(Serialize)]
pub struct StateUpdate<A> {
    pub state: String,
    pub attributes: A,
}

/// Nord Pool integration sensor, which carries the prices in its attributes.
pub struct PriceSensor<'a> {
    api: &'a Api,
    entity_id: &'a str,
}

impl<'a> PriceSensor<'a> {
    pub const fn new(api: &'a Api, entity_id: &'a str) -> Self {
        Self { api, entity_id }
    }
}

#[async_trait]
impl PriceSource for PriceSensor<'_> {
    async fn get_prices(&self) -> Result<DailyPrices> {
        let state = self
            .api
            .get_state::<DailyPrices>(self.entity_id)
            .await?
            .with_context(|| format!("price sensor `{}` not found", self.entity_id))?;
        Ok(state.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_url_ok() -> Result {
        let api = Api::try_new("token", Url::parse("http://localhost:8123/api/")?)?;
        assert_eq!(
            api.state_url("sensor.nordpool_fi")?.as_str(),
            "http://localhost:8123/api/states/sensor.nordpool_fi",
        );
        let api = Api::try_new("token", Url::parse("http://localhost:8123/api")?)?;
        assert_eq!(
            api.state_url("sensor.nordpool_fi")?.as_str(),
            "http://localhost:8123/api/states/sensor.nordpool_fi",
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_price_sensor_state_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "entity_id": "sensor.nordpool_fi",
                "state": "4.21",
                "attributes": {
                    "unit_of_measurement": "c/kWh",
                    "raw_today": [
                        {"start": "2025-10-03T00:00:00+03:00", "end": "2025-10-03T01:00:00+03:00", "value": 4.21},
                        {"start": "2025-10-03T01:00:00+03:00", "end": "2025-10-03T02:00:00+03:00", "value": "n/a"},
                        {"start": "2025-10-03T02:00:00+03:00", "end": "2025-10-03T03:00:00+03:00", "value": 3.07}
                    ],
                    "raw_tomorrow": [],
                    "tomorrow_valid": false
                },
                "last_changed": "2025-10-03T00:00:01.135921+00:00",
                "last_updated": "2025-10-03T00:00:01.135921+00:00"
            }
        "#;
        let state = serde_json::from_str::<EntityState<DailyPrices>>(RESPONSE)?;
        assert_eq!(state.state, "4.21");
        assert_eq!(state.attributes.raw_today.len(), 2);
        assert_eq!(state.attributes.raw_today[1].start.as_deref(), Some("2025-10-03T02:00:00+03:00"));
        assert!(state.attributes.raw_tomorrow.is_empty());
        Ok(())
    }

    #[test]
    fn test_serialize_state_update_ok() -> Result {
        let update = StateUpdate { state: "error".to_string(), attributes: serde_json::json!({}) };
        assert_eq!(serde_json::to_string(&update)?, r#"{"state":"error","attributes":{}}"#);
        Ok(())
    }
}
