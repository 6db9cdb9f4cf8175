use clap::Parser;

use crate::{
    api::home_assistant::{PriceSensor, StateUpdate},
    cli::{
        fetch_and_plan,
        heartbeat::HeartbeatArgs,
        home_assistant::HomeAssistantArgs,
        policy::PolicyArgs,
    },
    prelude::*,
    report::{ErrorReport, Report},
};

#[derive(Parser)]
pub struct HuntArgs {
    /// Plan and print the result without publishing it (dry run).
    #[clap(long)]
    pub scout: bool,

    #[clap(flatten)]
    pub home_assistant: HomeAssistantArgs,

    #[clap(flatten)]
    pub policy: PolicyArgs,

    #[clap(flatten)]
    pub heartbeat: HeartbeatArgs,
}

impl HuntArgs {
    #[instrument(skip_all, fields(scout = self.scout))]
    pub async fn run(self) -> Result {
        let policy = self.policy.try_into_policy()?;
        let api = self.home_assistant.connection.try_new_client()?;
        let sensor = PriceSensor::new(&api, &self.home_assistant.price_entity_id);
        let output_entity_id = &self.home_assistant.output_entity_id;

        let plan = match fetch_and_plan(&sensor, &policy).await {
            Ok(plan) => plan,
            Err(error) => {
                if !self.scout {
                    let update = StateUpdate {
                        state: "error".to_string(),
                        attributes: ErrorReport::new(format!("{error:#}")),
                    };
                    if let Err(error) = api.set_state(output_entity_id, &update).await {
                        warn!("failed to publish the error state: {error:#}");
                    }
                }
                return Err(error);
            }
        };

        let report = Report::new(&plan, &policy);
        if self.scout {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            let update = StateUpdate { state: report.state(), attributes: &report };
            api.set_state(output_entity_id, &update).await?;
        }

        self.heartbeat.send().await;
        Ok(())
    }
}
