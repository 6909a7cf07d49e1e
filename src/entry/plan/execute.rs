use serde::Serialize;

use crate::error::{AppError, AppResult, SinkError};
use crate::report::{Report, renderer_for, write_output};
use crate::runner::{Aggregator, RunSettings};

use super::types::{OutputPlan, RunPlan};

pub(in crate::entry) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Fetch(settings) => {
            let aggregator = Aggregator::new(settings)?;
            let result = aggregator.fetch_once().await;
            print_json(&result).await
        }
        RunPlan::FetchAll(settings) => {
            let aggregator = Aggregator::new(settings)?;
            let round = aggregator.fetch_round().await?;
            print_json(&round).await
        }
        RunPlan::Load { settings, output } => run_load(settings, &output).await,
    }
}

async fn run_load(settings: RunSettings, output: &OutputPlan) -> AppResult<()> {
    let aggregator = Aggregator::new(settings)?;
    let combined = aggregator.run().await?;
    let report = Report::from_combined(&combined);
    let bytes = renderer_for(output.format, output.color).render(&report)?;
    write_output(&bytes, output.path.as_deref()).await
}

async fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| AppError::sink(SinkError::SerializeReport { source: err }))?;
    bytes.push(b'\n');
    write_output(&bytes, None).await
}
