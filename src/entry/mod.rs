mod plan;

use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::ProbeArgs;
use crate::error::{AppError, AppResult, ValidationError};
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = parse_args(std::env::args_os())?;

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args<I>(raw_args: I) -> AppResult<(ProbeArgs, ArgMatches)>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = ProbeArgs::command().get_matches_from(raw_args);
    let args = ProbeArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: ProbeArgs, matches: &ArgMatches) -> AppResult<()> {
    let plan = build_plan(args, matches)?;
    execute_plan(plan).await?;
    Ok(())
}
