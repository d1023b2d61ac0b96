//! Command implementations.
//!
//! Results are printed to stdout as pretty JSON (or plain text for resource
//! reads); logs go to stderr. Each command returns whether it succeeded,
//! which becomes the process exit code.

use crate::app::{build_dispatcher, cancel_on_ctrl_c};
use crate::error::CliError;
use crate::PlanCommands;
use opsdeck_core::{ActionArgs, ActionCall};
use opsdeck_http::{HttpRuntime, HttpRuntimeConfig};
use opsdeck_testplan::{RunnerConfig, TestPlanRunner};
use serde_json::Value;
use std::net::SocketAddr;
use tracing::info;

pub async fn serve(
    mut config: HttpRuntimeConfig,
    bind: Option<SocketAddr>,
) -> Result<bool, CliError> {
    if let Some(addr) = bind {
        config.bind_addr = addr;
    }
    let dispatcher = build_dispatcher(&config, RunnerConfig::default())?;
    info!(
        addr = %config.bind_addr,
        timeout_secs = config.request_timeout_secs,
        cors = config.enable_cors,
        "Starting HTTP runtime"
    );
    HttpRuntime::new(dispatcher).serve(config).await?;
    Ok(true)
}

pub async fn plans(command: PlanCommands) -> Result<bool, CliError> {
    match command {
        PlanCommands::List => {
            let runner = TestPlanRunner::new(RunnerConfig::default())?;
            print_json(&runner.list_plans())?;
            Ok(true)
        }
        PlanCommands::Run { name, target } => {
            let mut runner_config = RunnerConfig::default();
            if let Some(target) = target {
                runner_config = runner_config.with_target_override(target);
            }
            let runner = TestPlanRunner::new(runner_config)?;

            let result = runner.run(&name, &cancel_on_ctrl_c()).await;
            print_json(&result)?;
            Ok(result.passed())
        }
    }
}

pub async fn invoke(
    config: &HttpRuntimeConfig,
    action: String,
    args: Option<String>,
) -> Result<bool, CliError> {
    let args = parse_args(args.as_deref())?;
    let dispatcher = build_dispatcher(config, RunnerConfig::default())?;

    let outcome = dispatcher
        .invoke(&ActionCall::new(action, args), &cancel_on_ctrl_c())
        .await;
    print_json(&outcome)?;
    Ok(outcome.is_success())
}

pub fn read(config: &HttpRuntimeConfig, uri: &str, json: bool) -> Result<bool, CliError> {
    let dispatcher = build_dispatcher(config, RunnerConfig::default())?;
    let content = dispatcher.read(uri);
    if json {
        print_json(&content)?;
    } else {
        println!("{}", content.text);
    }
    Ok(content.found)
}

/// Parse `--args` into action arguments. Absent means no arguments.
pub fn parse_args(raw: Option<&str>) -> Result<ActionArgs, CliError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(ActionArgs::new());
    };
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CliError::InvalidArgs(e.to_string()))?;
    ActionArgs::from_value(value).map_err(|reason| CliError::InvalidArgs(reason.message()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
