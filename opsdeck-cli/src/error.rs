//! Errors that end a CLI command.

use opsdeck_core::CoreError;
use opsdeck_http::{ConfigError, ServerError};
use opsdeck_testplan::RunnerError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("Failed to assemble components: {0}")]
    Setup(#[from] CoreError),

    #[error("Invalid --args: {0}")]
    InvalidArgs(String),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
