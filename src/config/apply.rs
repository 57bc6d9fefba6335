use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{Command, LoadArgs, ProbeArgs, ProxyArgs, TestArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue, LoadConfig, ProxyConfig, TestConfig};

/// Fills arguments not given on the command line from the config file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut ProbeArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    match &mut args.command {
        Command::Test(test) => {
            let sub = matches.subcommand_matches("test").unwrap_or(matches);
            if let Some(section) = config.test.as_ref() {
                apply_test_section(test, sub, section)?;
            }
            apply_proxy_section(&mut test.proxy, sub, config.proxy.as_ref());
        }
        Command::Load(load) => {
            let sub = matches.subcommand_matches("load").unwrap_or(matches);
            if let Some(section) = config.load.as_ref() {
                apply_load_section(load, sub, section)?;
            }
            apply_proxy_section(&mut load.proxy, sub, config.proxy.as_ref());
        }
    }
    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn set_if_absent<T: Clone>(matches: &ArgMatches, name: &str, target: &mut T, value: Option<&T>) {
    if !is_cli(matches, name)
        && let Some(value) = value
    {
        *target = value.clone();
    }
}

fn set_option_if_absent(
    matches: &ArgMatches,
    name: &str,
    target: &mut Option<String>,
    value: Option<&String>,
) {
    if !is_cli(matches, name)
        && let Some(value) = value
    {
        *target = Some(value.clone());
    }
}

fn request_timeout(value: &DurationValue) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidField {
            field: "request_timeout",
            source: err,
        })
    })
}

fn apply_test_section(
    args: &mut TestArgs,
    matches: &ArgMatches,
    section: &TestConfig,
) -> AppResult<()> {
    set_option_if_absent(matches, "dest", &mut args.dest, section.dest.as_ref());
    set_if_absent(matches, "workers", &mut args.workers, section.workers.as_ref());
    set_if_absent(matches, "limit", &mut args.limit, section.limit.as_ref());
    set_if_absent(matches, "method", &mut args.method, section.method.as_ref());
    set_if_absent(matches, "timeout", &mut args.timeout, section.timeout.as_ref());
    set_if_absent(
        matches,
        "header_size",
        &mut args.header_size,
        section.header_size.as_ref(),
    );
    set_if_absent(
        matches,
        "header_inc_rate",
        &mut args.header_inc_rate,
        section.header_inc_rate.as_ref(),
    );
    set_if_absent(
        matches,
        "header_multi_rate",
        &mut args.header_multi_rate,
        section.header_multi_rate.as_ref(),
    );
    set_if_absent(matches, "body_size", &mut args.body_size, section.body_size.as_ref());
    set_if_absent(
        matches,
        "body_inc_rate",
        &mut args.body_inc_rate,
        section.body_inc_rate.as_ref(),
    );
    set_if_absent(
        matches,
        "body_multi_rate",
        &mut args.body_multi_rate,
        section.body_multi_rate.as_ref(),
    );
    set_option_if_absent(
        matches,
        "body_from_file",
        &mut args.body_from_file,
        section.body_from_file.as_ref(),
    );
    set_if_absent(
        matches,
        "max_payload",
        &mut args.max_payload,
        section.max_payload.as_ref(),
    );

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = section.request_timeout.as_ref()
    {
        args.request_timeout = request_timeout(timeout)?;
    }
    Ok(())
}

fn apply_load_section(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    section: &LoadConfig,
) -> AppResult<()> {
    set_option_if_absent(matches, "list", &mut args.list, section.list.as_ref());
    set_if_absent(matches, "workers", &mut args.workers, section.workers.as_ref());
    set_if_absent(matches, "timeout", &mut args.timeout, section.timeout.as_ref());

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = section.request_timeout.as_ref()
    {
        args.request_timeout = request_timeout(timeout)?;
    }
    Ok(())
}

fn apply_proxy_section(args: &mut ProxyArgs, matches: &ArgMatches, section: Option<&ProxyConfig>) {
    let Some(section) = section else {
        return;
    };
    set_option_if_absent(matches, "proxy", &mut args.proxy, section.url.as_ref());
    set_option_if_absent(matches, "proxy_user", &mut args.proxy_user, section.user.as_ref());
    set_option_if_absent(
        matches,
        "proxy_pass",
        &mut args.proxy_pass,
        section.password.as_ref(),
    );
}
