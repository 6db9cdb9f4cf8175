#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod fmt;
mod prelude;
mod quantity;
mod report;
mod tables;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    Args::parse().run().await?;

    info!("done!");
    Ok(())
}
