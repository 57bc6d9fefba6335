use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};
use url::Url;

use crate::args::{Command, LoadArgs, ProbeArgs, ProxyArgs, TestArgs};
use crate::config::{apply_config, load_config, load_url_list};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::ProxyTarget;

use super::types::{BodySpec, GrowthSpec, LoadPlan, RunPlan, TestPlan};

/// Merges the config file into the CLI arguments and validates the result.
///
/// # Errors
///
/// Returns an error for unreadable config files and invalid settings.
pub(crate) fn build_plan(mut args: ProbeArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let plan = match args.command {
        Command::Test(test) => RunPlan::Test(build_test_plan(test)?),
        Command::Load(load) => RunPlan::Load(build_load_plan(&load)?),
    };
    Ok(plan)
}

pub(crate) fn build_test_plan(args: TestArgs) -> AppResult<TestPlan> {
    let Some(dest) = args.dest.as_deref() else {
        error!("Missing destination (set --dest or provide it in config).");
        return Err(AppError::validation(ValidationError::MissingDestination));
    };
    let destination = parse_destination(dest)?;
    let workers = ensure_workers(args.workers)?;

    let header = growth_spec(
        "header",
        args.header_size,
        args.header_inc_rate,
        args.header_multi_rate,
        args.max_payload,
    )?;

    let body = match args.body_from_file {
        Some(_) if args.body_size > 0 => {
            return Err(AppError::validation(
                ValidationError::BodySizeAndFileConflict,
            ));
        }
        Some(path) => Some(BodySpec::File(PathBuf::from(path))),
        None => growth_spec(
            "body",
            args.body_size,
            args.body_inc_rate,
            args.body_multi_rate,
            args.max_payload,
        )?
        .map(BodySpec::Generated),
    };
    if body.is_some() && !args.method.allows_body() {
        return Err(AppError::validation(ValidationError::BodyNotAllowed {
            method: args.method.as_str(),
        }));
    }

    Ok(TestPlan {
        destination,
        method: args.method,
        workers,
        limit: args.limit,
        timeout: run_timeout(args.timeout),
        request_timeout: args.request_timeout,
        header,
        body,
        max_payload: args.max_payload,
        proxy: proxy_target(&args.proxy)?,
    })
}

pub(crate) fn build_load_plan(args: &LoadArgs) -> AppResult<LoadPlan> {
    let Some(list) = args.list.as_deref() else {
        error!("Missing URL list (set --list or provide it in config).");
        return Err(AppError::validation(ValidationError::MissingUrlList));
    };
    let workers = ensure_workers(args.workers)?;

    let urls = load_url_list(&PathBuf::from(list))?;
    for url in &urls {
        parse_destination(url)?;
    }
    info!("Loaded {} URLs from {}", urls.len(), list);

    Ok(LoadPlan {
        urls,
        workers,
        timeout: run_timeout(args.timeout),
        request_timeout: args.request_timeout,
        proxy: proxy_target(&args.proxy)?,
    })
}

/// Parses an http(s) URL with a host.
pub(crate) fn parse_destination(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw.trim()).map_err(|err| ValidationError::InvalidUrl {
        url: raw.to_owned(),
        source: err,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
        });
    }
    if url.host_str().is_none() {
        return Err(ValidationError::UrlMissingHost {
            url: raw.to_owned(),
        });
    }
    Ok(url)
}

fn ensure_workers(workers: usize) -> Result<usize, ValidationError> {
    if workers == 0 {
        return Err(ValidationError::ZeroWorkers);
    }
    Ok(workers)
}

const fn run_timeout(seconds: u64) -> Option<Duration> {
    if seconds == 0 {
        None
    } else {
        Some(Duration::from_secs(seconds))
    }
}

/// `None` when no payload of this kind is configured. Growth rates without an
/// initial size are rejected.
fn growth_spec(
    section: &'static str,
    size: usize,
    increment: usize,
    multiplier: usize,
    max_payload: usize,
) -> Result<Option<GrowthSpec>, ValidationError> {
    if size == 0 {
        if increment > 0 || multiplier > 1 {
            return Err(ValidationError::ZeroInitialSize { section });
        }
        return Ok(None);
    }
    if size > max_payload {
        return Err(ValidationError::InitialSizeTooLarge {
            section,
            size,
            limit: max_payload,
        });
    }
    Ok(Some(GrowthSpec {
        size,
        increment,
        multiplier,
    }))
}

fn proxy_target(args: &ProxyArgs) -> Result<Option<ProxyTarget>, ValidationError> {
    let Some(raw) = args.proxy.as_deref().filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    let target = ProxyTarget::parse(raw, args.proxy_user.as_deref(), args.proxy_pass.as_deref())?;
    info!("Using proxy {}", target);
    Ok(Some(target))
}
