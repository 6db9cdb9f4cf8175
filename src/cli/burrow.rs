use std::path::PathBuf;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};

use crate::{
    api::{PriceFile, PriceSource},
    core::{normalizer::Normalizer, phase::Phase},
    prelude::*,
    tables::build_timeline_table,
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    command: BurrowCommand,
}

impl BurrowArgs {
    pub async fn run(self) -> Result {
        match self.command {
            BurrowCommand::Timeline(args) => args.run().await,
        }
    }
}

#[derive(Subcommand)]
pub enum BurrowCommand {
    /// Print the normalized price timeline.
    Timeline(BurrowTimelineArgs),
}

#[derive(Parser)]
pub struct BurrowTimelineArgs {
    /// JSON file with `raw_today` and `raw_tomorrow` price lists.
    #[clap(long = "prices-file", env = "PRICES_FILE")]
    prices_file: PathBuf,

    /// Normalized timeline slot duration, in minutes.
    #[clap(long, default_value = "15", env = "GRANULARITY_MINUTES")]
    granularity_minutes: u16,
}

impl BurrowTimelineArgs {
    async fn run(self) -> Result {
        ensure!(self.granularity_minutes > 0, "the granularity must be positive");
        let prices = PriceFile::new(self.prices_file).get_prices().await?;
        let (timeline, source_minutes) =
            Normalizer::new(TimeDelta::minutes(self.granularity_minutes.into()))
                .normalize_days(&[&prices.raw_today[..], &prices.raw_tomorrow[..]]);
        if !timeline.is_contiguous() {
            warn!(?source_minutes, "the timeline has gaps or overlaps");
        }
        let phases = vec![Phase::Normal; timeline.len()];
        println!("{}", build_timeline_table(&timeline, &phases));
        Ok(())
    }
}
