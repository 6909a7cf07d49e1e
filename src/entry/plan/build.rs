use std::io::IsTerminal;
use std::path::PathBuf;

use clap::ArgMatches;

use crate::args::PerfArgs;
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::runner::RunSettings;

use super::types::{OutputPlan, RunPlan};

pub(in crate::entry) fn build_plan(mut args: PerfArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    plan_from_args(&args, std::io::stdout().is_terminal())
}

pub(super) fn plan_from_args(args: &PerfArgs, stdout_is_terminal: bool) -> AppResult<RunPlan> {
    if args.fetch && args.fetch_all {
        return Err(AppError::validation(ValidationError::FetchModesConflict));
    }
    let settings = match RunSettings::from_args(args) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("{}", err);
            return Err(err);
        }
    };

    if args.fetch {
        return Ok(RunPlan::Fetch(settings));
    }
    if args.fetch_all {
        return Ok(RunPlan::FetchAll(settings));
    }

    let path = args.output.as_ref().map(PathBuf::from);
    let color = !args.no_color && path.is_none() && stdout_is_terminal;
    Ok(RunPlan::Load {
        settings,
        output: OutputPlan {
            format: args.output_format,
            path,
            color,
        },
    })
}
