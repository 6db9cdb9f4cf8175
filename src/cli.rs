mod burrow;
mod heartbeat;
mod home_assistant;
mod hunt;
mod policy;
mod replay;

use clap::{Parser, Subcommand};

use crate::{
    api::PriceSource,
    cli::{burrow::BurrowArgs, hunt::HuntArgs, replay::ReplayArgs},
    core::{
        planner::{Plan, Planner},
        policy::Policy,
    },
    prelude::*,
    tables::build_periods_table,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        match self.command {
            Command::Hunt(args) => args.run().await,
            Command::Replay(args) => args.run().await,
            Command::Burrow(args) => args.run().await,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the prices from Home Assistant, plan the cutoffs, and publish them back.
    #[clap(name = "hunt")]
    Hunt(Box<HuntArgs>),

    /// Plan the cutoffs for prices stored in a file.
    #[clap(name = "replay")]
    Replay(Box<ReplayArgs>),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}

/// Fetch the prices and plan the cutoffs.
#[instrument(skip_all)]
async fn fetch_and_plan(source: &dyn PriceSource, policy: &Policy) -> Result<Plan> {
    let prices = source.get_prices().await?;
    let plan = Planner::builder()
        .policy(policy)
        .today(&prices.raw_today)
        .tomorrow(&prices.raw_tomorrow)
        .plan();
    info!(
        n_periods = plan.schedule.items.len(),
        total_saving = %plan.schedule.total_weight,
        n_scanned = plan.diagnostics.n_scanned,
        "planned",
    );
    println!("{}", build_periods_table(&plan.schedule.items));
    Ok(plan)
}
