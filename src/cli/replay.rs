use std::path::PathBuf;

use clap::Parser;

use crate::{
    api::PriceFile,
    cli::{fetch_and_plan, policy::PolicyArgs},
    core::phase::Phase,
    prelude::*,
    report::Report,
    tables::build_timeline_table,
};

#[derive(Parser)]
pub struct ReplayArgs {
    /// JSON file with `raw_today` and `raw_tomorrow` price lists.
    #[clap(long = "prices-file", env = "PRICES_FILE")]
    pub prices_file: PathBuf,

    /// Write the report to the file instead of the standard output.
    #[clap(long = "output-file", env = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Also print the whole timeline with the phases.
    #[clap(long)]
    pub show_timeline: bool,

    #[clap(flatten)]
    pub policy: PolicyArgs,
}

impl ReplayArgs {
    #[instrument(skip_all, fields(prices_file = %self.prices_file.display()))]
    pub async fn run(self) -> Result {
        let policy = self.policy.try_into_policy()?;
        let plan = fetch_and_plan(&PriceFile::new(self.prices_file), &policy).await?;
        if self.show_timeline {
            let phases = Phase::assign(plan.timeline.len(), &plan.schedule.items);
            println!("{}", build_timeline_table(&plan.timeline, &phases));
        }

        let report = serde_json::to_string_pretty(&Report::new(&plan, &policy))?;
        match self.output_file {
            Some(path) => {
                std::fs::write(&path, report)
                    .with_context(|| format!("failed to write `{}`", path.display()))?;
                info!(path = %path.display(), "saved the report");
            }
            None => println!("{report}"),
        }
        Ok(())
    }
}
